//! boundcache: bounded LRI/LRU caches with hit/miss accounting and miss loaders.
//!
//! - [`policy::engine::RecencyCore`]: single-threaded engine, `&mut self` API.
//! - [`policy::concurrent::BoundedCache`]: `RwLock`-guarded wrapper with an
//!   optional `on_miss` loader and `Result`-returning lookups.
//! - [`registry::InstanceRegistry`]: keyed instance memo with explicit release.
//!
//! ```
//! use boundcache::Lri;
//!
//! let cache: Lri<&str, u32> = Lri::try_new(2).unwrap();
//! cache.set("a", 1);
//! cache.set("b", 2);
//! let _ = cache.get(&"a"); // no reordering under LRI
//! cache.set("c", 3);
//! assert!(!cache.contains(&"a"));
//! ```

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;
pub mod stats;
pub mod traits;

#[cfg(feature = "concurrency")]
pub mod registry;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;

pub use error::{CacheError, ConfigError, MissError};
pub use policy::lri::LriCore;
pub use policy::lru::LruCore;
pub use stats::CacheStats;

#[cfg(feature = "concurrency")]
pub use policy::concurrent::BoundedCache;
#[cfg(feature = "concurrency")]
pub use policy::lri::Lri;
#[cfg(feature = "concurrency")]
pub use policy::lru::Lru;
