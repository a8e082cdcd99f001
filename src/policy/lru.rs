//! # Least Recently Used (LRU)
//!
//! Eviction follows access order. Every hit promotes the entry to newest, as
//! does every write to an existing key.
//!
//! ```text
//!   capacity = 3
//!
//!   set(a) set(b) set(c)      oldest ─► a ─ b ─ c ◄─ newest
//!   get(a) (hit, promote)     oldest ─► b ─ c ─ a ◄─ newest
//!   set(d)  → evicts b        oldest ─► c ─ a ─ d ◄─ newest
//! ```
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use boundcache::policy::lru::LruCore;
//! use boundcache::traits::CoreCache;
//!
//! let mut cache = LruCore::try_new(2).unwrap();
//! cache.insert("a", Arc::new(1));
//! cache.insert("b", Arc::new(2));
//! cache.get(&"a");
//! cache.insert("c", Arc::new(3));
//!
//! assert!(cache.contains(&"a"));
//! assert!(!cache.contains(&"b"));
//! ```

use crate::policy::engine::RecencyCore;
use crate::policy::RecencyPolicy;

/// Policy marker: eviction by access order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AccessOrder;

impl RecencyPolicy for AccessOrder {
    const NAME: &'static str = "lru";
    const PROMOTE_ON_READ: bool = true;
}

/// Single-threaded LRU cache.
pub type LruCore<K, V> = RecencyCore<K, V, AccessOrder>;

/// Thread-safe LRU cache.
#[cfg(feature = "concurrency")]
pub type Lru<K, V> = crate::policy::concurrent::BoundedCache<K, V, AccessOrder>;
