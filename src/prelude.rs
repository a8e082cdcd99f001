pub use crate::builder::{CacheBuilder, CacheConfig, DEFAULT_CAPACITY};
pub use crate::ds::{RecencyList, SlotId};
pub use crate::error::{CacheError, ConfigError, InvariantError, MissError};
pub use crate::policy::engine::RecencyCore;
pub use crate::policy::lri::{InsertionOrder, LriCore};
pub use crate::policy::lru::{AccessOrder, LruCore};
pub use crate::policy::RecencyPolicy;
pub use crate::stats::CacheStats;
pub use crate::traits::{CoreCache, MutableCache, RecencyCacheTrait};

#[cfg(feature = "concurrency")]
pub use crate::policy::concurrent::{BoundedCache, OnMiss};
#[cfg(feature = "concurrency")]
pub use crate::policy::lri::Lri;
#[cfg(feature = "concurrency")]
pub use crate::policy::lru::Lru;
#[cfg(feature = "concurrency")]
pub use crate::registry::InstanceRegistry;
#[cfg(feature = "concurrency")]
pub use crate::traits::ConcurrentCache;

#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::RecencyMetricsSnapshot;
