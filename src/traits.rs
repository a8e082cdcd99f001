//! # Cache Trait Hierarchy
//!
//! Traits implemented by the single-threaded [`RecencyCore`] engine. The
//! thread-safe [`BoundedCache`] wrapper exposes the same operations through
//! `&self` methods instead, because its lookups return owned `Arc<V>` handles
//! rather than borrows tied to a lock guard.
//!
//! ## Architecture
//!
//! ```text
//!              ┌─────────────────────────────────────────┐
//!              │            CoreCache<K, V>              │
//!              │                                         │
//!              │  insert(&mut, K, V) → Option<V>         │
//!              │  get(&mut, &K) → Option<&V>             │
//!              │  contains(&, &K) → bool                 │
//!              │  len / is_empty / capacity / clear      │
//!              └──────────────────┬──────────────────────┘
//!                                 │
//!                                 ▼
//!              ┌─────────────────────────────────────────┐
//!              │          MutableCache<K, V>             │
//!              │  remove(&K) → Option<V>                 │
//!              │  remove_batch(&[K])                     │
//!              └──────────────────┬──────────────────────┘
//!                                 │
//!                                 ▼
//!              ┌─────────────────────────────────────────┐
//!              │        RecencyCacheTrait<K, V>          │
//!              │  pop_oldest() → (K, V)                  │
//!              │  peek_oldest() → (&K, &V)               │
//!              │  touch(&K) → bool                       │
//!              │  recency_rank(&K) → usize               │
//!              └─────────────────────────────────────────┘
//! ```
//!
//! "Oldest" means least recently inserted for LRI and least recently used for
//! LRU; the trait is shared because both policies keep one recency list.
//!
//! [`RecencyCore`]: crate::policy::engine::RecencyCore
//! [`BoundedCache`]: crate::policy::concurrent::BoundedCache

/// Core cache operations that all caches support.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use boundcache::traits::CoreCache;
/// use boundcache::policy::lru::LruCore;
///
/// fn warm_cache<C: CoreCache<u64, Arc<String>>>(cache: &mut C, data: &[(u64, String)]) {
///     for (key, value) in data {
///         cache.insert(*key, Arc::new(value.clone()));
///     }
/// }
///
/// let mut cache = LruCore::try_new(100).unwrap();
/// warm_cache(&mut cache, &[(1, "one".to_string()), (2, "two".to_string())]);
/// assert_eq!(cache.len(), 2);
/// ```
pub trait CoreCache<K, V> {
    /// Inserts a key-value pair, returning the previous value if it existed.
    ///
    /// If the cache is at capacity, the oldest entry is evicted first.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Gets a reference to a value by key.
    ///
    /// Counts a hit or a miss, and promotes the entry under access-order
    /// policies. Use [`contains`](Self::contains) to check existence without
    /// side effects.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Checks if a key exists without updating access state or counters.
    fn contains(&self, key: &K) -> bool;

    /// Returns the current number of entries in the cache.
    fn len(&self) -> usize;

    /// Returns `true` if the cache contains no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum capacity of the cache.
    fn capacity(&self) -> usize;

    /// Removes all entries from the cache.
    fn clear(&mut self);
}

/// Caches that support arbitrary key-based removal.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use boundcache::traits::{CoreCache, MutableCache};
/// use boundcache::policy::lri::LriCore;
///
/// let mut cache = LriCore::try_new(10).unwrap();
/// cache.insert(1, Arc::new("one"));
/// cache.insert(2, Arc::new("two"));
/// cache.insert(3, Arc::new("three"));
///
/// let removed = cache.remove_batch(&[1, 99, 3]);
/// assert_eq!(removed.iter().filter(|v| v.is_some()).count(), 2);
/// assert_eq!(cache.len(), 1);
/// ```
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes a specific key-value pair.
    ///
    /// Returns the removed value if the key existed, or `None` if it didn't.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes multiple keys.
    ///
    /// Returns a vector of `Option<V>` in the same order as the input keys.
    /// The default implementation loops over [`remove`](Self::remove).
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|k| self.remove(k)).collect()
    }
}

/// Operations over the recency list shared by LRI and LRU.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use boundcache::traits::{CoreCache, RecencyCacheTrait};
/// use boundcache::policy::lru::LruCore;
///
/// let mut cache: LruCore<u64, &str> = LruCore::try_new(3).unwrap();
/// cache.insert(1, Arc::new("first"));
/// cache.insert(2, Arc::new("second"));
/// cache.insert(3, Arc::new("third"));
///
/// // Access key 1 to make it newest
/// cache.get(&1);
///
/// // Key 2 is now the eviction candidate
/// assert_eq!(cache.peek_oldest().map(|(k, _)| *k), Some(2));
///
/// // Touch without retrieving value
/// assert!(cache.touch(&2));
/// assert_eq!(cache.recency_rank(&2), Some(0));
///
/// let (key, _) = cache.pop_oldest().unwrap();
/// assert_eq!(key, 3);
/// ```
pub trait RecencyCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the eviction candidate.
    fn pop_oldest(&mut self) -> Option<(K, V)>;

    /// Peeks at the eviction candidate without removing it.
    fn peek_oldest(&self) -> Option<(&K, &V)>;

    /// Moves an entry to the newest position without counting a hit.
    ///
    /// Returns `true` if the key was found.
    fn touch(&mut self, key: &K) -> bool;

    /// Gets the recency rank of a key (0 = newest, higher = older).
    ///
    /// Returns `None` if the key is not found.
    fn recency_rank(&self, key: &K) -> Option<usize>;

    /// Removes up to `count` entries in eviction order.
    fn pop_oldest_batch(&mut self, count: usize) -> Vec<(K, V)> {
        (0..count).map_while(|_| self.pop_oldest()).collect()
    }
}

/// Marker trait for caches that are safe to share across threads.
///
/// # Example
///
/// ```
/// use boundcache::traits::ConcurrentCache;
///
/// fn share<C: ConcurrentCache>(_cache: &C) {}
///
/// # #[cfg(feature = "concurrency")]
/// # {
/// let cache = boundcache::Lru::<u64, u64>::try_new(8).unwrap();
/// share(&cache);
/// # }
/// ```
pub trait ConcurrentCache: Send + Sync {}
