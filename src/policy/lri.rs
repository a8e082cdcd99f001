//! # Least Recently Inserted (LRI)
//!
//! Eviction follows insertion order. Reads never reorder entries; an explicit
//! write to an existing key does, so a rewritten key counts as freshly
//! inserted.
//!
//! ```text
//!   capacity = 3
//!
//!   set(a) set(b) set(c)      oldest ─► a ─ b ─ c ◄─ newest
//!   get(a) (hit, no move)     oldest ─► a ─ b ─ c ◄─ newest
//!   set(d)  → evicts a        oldest ─► b ─ c ─ d ◄─ newest
//!   set(b, b') (rewrite)      oldest ─► c ─ d ─ b ◄─ newest
//! ```
//!
//! One can also think of an LRI with a miss loader as a size-limited
//! default-dict keyed by the missing key.

use crate::policy::engine::RecencyCore;
use crate::policy::RecencyPolicy;

/// Policy marker: eviction by insertion order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct InsertionOrder;

impl RecencyPolicy for InsertionOrder {
    const NAME: &'static str = "lri";
    const PROMOTE_ON_READ: bool = false;
}

/// Single-threaded LRI cache.
pub type LriCore<K, V> = RecencyCore<K, V, InsertionOrder>;

/// Thread-safe LRI cache.
#[cfg(feature = "concurrency")]
pub type Lri<K, V> = crate::policy::concurrent::BoundedCache<K, V, InsertionOrder>;
