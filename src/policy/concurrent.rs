//! # Thread-Safe Bounded Cache
//!
//! [`BoundedCache`] wraps a [`RecencyCore`] in a `parking_lot::RwLock` and adds
//! the miss loader (`on_miss`) and the `Result`-returning lookup API.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────┐
//!   │                     BoundedCache<K, V, P>                        │
//!   │                                                                  │
//!   │   inner:   Arc<RwLock<RecencyCore<K, V, P>>>                     │
//!   │   on_miss: Option<Arc<dyn Fn(&K) -> Result<V, MissError>>>       │
//!   └──────────────────────────────────────────────────────────────────┘
//!
//!   get(k) ──► write lock ──► lookup ──hit──► Arc<V>
//!                               │
//!                              miss
//!                               │
//!                      unlock, call on_miss(k)   (no lock held)
//!                               │
//!                      write lock ──► insert ──► Arc<V>
//! ```
//!
//! ## Locking
//!
//! | Operation                                   | Lock  |
//! |---------------------------------------------|-------|
//! | `get`, `set*`, `pop*`, `delete`, `clear`    | write |
//! | `peek`, `contains`, `len`, `stats`, `iter`  | read  |
//! | `copy`, `snapshot`, equality                | read  |
//!
//! `get` takes the write lock because it always updates counters and, under
//! LRU, the recency order.
//!
//! The loader runs with no lock held, so it may read or write the same cache.
//! If another thread stores the key while the loader runs, the loaded value
//! overwrites it (last write wins).
//!
//! Cloning a `BoundedCache` shares the underlying storage; use
//! [`copy`](BoundedCache::copy) for an independent cache.

use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};
use tracing::debug;

use crate::ds::SlotId;
use crate::error::{CacheError, ConfigError, InvariantError, MissError};
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::RecencyMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::MetricsSnapshotProvider;
use crate::policy::engine::RecencyCore;
use crate::policy::RecencyPolicy;
use crate::stats::CacheStats;
use crate::traits::{ConcurrentCache, CoreCache, MutableCache, RecencyCacheTrait};

/// Shared miss loader.
pub type OnMiss<K, V> = Arc<dyn Fn(&K) -> Result<V, MissError> + Send + Sync>;

/// Thread-safe bounded cache with an optional miss loader.
///
/// # Example
///
/// ```
/// use boundcache::Lru;
///
/// let cache: Lru<&str, i32> = Lru::try_new(2).unwrap();
/// cache.set("a", 1);
/// cache.set("b", 2);
/// assert_eq!(*cache.get(&"a").unwrap(), 1);
///
/// cache.set("c", 3); // evicts "b", the least recently used
/// assert!(cache.get(&"b").unwrap_err().is_key_not_found());
/// assert_eq!(cache.hit_count(), 1);
/// assert_eq!(cache.miss_count(), 1);
/// ```
pub struct BoundedCache<K, V, P> {
    inner: Arc<RwLock<RecencyCore<K, V, P>>>,
    on_miss: Option<OnMiss<K, V>>,
}

impl<K, V, P> BoundedCache<K, V, P>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Send + Sync,
    P: RecencyPolicy,
{
    /// Creates an empty cache without a miss loader.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self::from_core(RecencyCore::new(capacity), None)
    }

    /// Fallible constructor for user-supplied capacities.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        RecencyCore::try_new(capacity).map(|core| Self::from_core(core, None))
    }

    /// Creates an empty cache that calls `loader` on a hard miss in
    /// [`get`](Self::get).
    ///
    /// # Example
    ///
    /// ```
    /// use std::num::NonZeroUsize;
    /// use boundcache::Lri;
    ///
    /// let squares: Lri<u64, u64> =
    ///     Lri::with_on_miss(NonZeroUsize::new(16).unwrap(), |k: &u64| Ok(k * k));
    /// assert_eq!(*squares.get(&7).unwrap(), 49);
    /// assert_eq!(squares.miss_count(), 1);
    /// assert!(squares.contains(&7));
    /// ```
    pub fn with_on_miss<F>(capacity: NonZeroUsize, loader: F) -> Self
    where
        F: Fn(&K) -> Result<V, MissError> + Send + Sync + 'static,
    {
        Self::from_core(RecencyCore::new(capacity), Some(Arc::new(loader)))
    }

    pub(crate) fn from_core(core: RecencyCore<K, V, P>, on_miss: Option<OnMiss<K, V>>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(core)),
            on_miss,
        }
    }

    /// Returns `true` if this cache has a miss loader.
    pub fn has_on_miss(&self) -> bool {
        self.on_miss.is_some()
    }

    /// Looks up `key`.
    ///
    /// A hit counts one hit (and promotes under LRU). A miss counts one miss,
    /// then either loads and stores the value through `on_miss` or returns
    /// [`CacheError::KeyNotFound`].
    ///
    /// # Errors
    ///
    /// - [`CacheError::KeyNotFound`] on a miss without a loader.
    /// - [`CacheError::OnMiss`] when the loader fails; nothing is stored.
    pub fn get(&self, key: &K) -> Result<Arc<V>, CacheError> {
        let hit = self.inner.write().lookup(key).map(Arc::clone);
        if let Some(value) = hit {
            return Ok(value);
        }

        let loader = match &self.on_miss {
            Some(loader) => loader,
            None => return Err(CacheError::KeyNotFound),
        };

        debug!(policy = P::NAME, "calling miss loader");
        let value = match loader(key) {
            Ok(value) => Arc::new(value),
            Err(err) => {
                debug!(policy = P::NAME, error = %err, "miss loader failed");
                return Err(CacheError::OnMiss(err));
            },
        };
        self.inner.write().insert(key.clone(), Arc::clone(&value));
        Ok(value)
    }

    /// Like [`get`](Self::get), but returns `default` instead of
    /// [`CacheError::KeyNotFound`], counting a soft miss. `default` is not
    /// stored.
    ///
    /// # Errors
    ///
    /// Loader failures still surface as [`CacheError::OnMiss`].
    pub fn get_or_default(&self, key: &K, default: V) -> Result<Arc<V>, CacheError> {
        match self.get(key) {
            Err(CacheError::KeyNotFound) => {
                self.inner.write().record_soft_miss();
                Ok(Arc::new(default))
            },
            other => other,
        }
    }

    /// Dictionary-style lookup: `Ok(None)` where [`get`](Self::get) would
    /// return `KeyNotFound`, counted as a soft miss.
    pub fn get_opt(&self, key: &K) -> Result<Option<Arc<V>>, CacheError> {
        match self.get(key) {
            Ok(value) => Ok(Some(value)),
            Err(CacheError::KeyNotFound) => {
                self.inner.write().record_soft_miss();
                Ok(None)
            },
            Err(err) => Err(err),
        }
    }

    /// Returns the value for `key`, storing `default` if absent.
    ///
    /// A present key behaves like a hit in [`get`](Self::get). An absent key
    /// counts one miss and one soft miss and stores `default` without calling
    /// the loader. Runs in a single critical section.
    ///
    /// # Example
    ///
    /// ```
    /// use boundcache::Lri;
    ///
    /// let cache: Lri<&str, Vec<u8>> = Lri::try_new(4).unwrap();
    /// let first = cache.set_default("buf", vec![1]);
    /// let second = cache.set_default("buf", vec![2]);
    /// assert_eq!(*second, vec![1]);
    /// assert!(std::sync::Arc::ptr_eq(&first, &second));
    /// assert_eq!(cache.soft_miss_count(), 1);
    /// ```
    pub fn set_default(&self, key: K, default: V) -> Arc<V> {
        self.inner.write().get_or_insert(key, Arc::new(default))
    }

    /// Stores `value` under `key` as the newest entry, evicting the oldest
    /// entry if a new key does not fit. Returns the previous value.
    pub fn set(&self, key: K, value: V) -> Option<Arc<V>> {
        let value = Arc::new(value);
        self.inner.write().insert(key, value)
    }

    /// Like [`set`](Self::set) for an already shared value.
    pub fn set_arc(&self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        self.inner.write().insert(key, value)
    }

    /// Stores every pair in iteration order, as repeated [`set`](Self::set)
    /// calls under one lock acquisition.
    ///
    /// The input is drained before the lock is taken.
    pub fn update<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let entries: Vec<(K, Arc<V>)> = entries
            .into_iter()
            .map(|(key, value)| (key, Arc::new(value)))
            .collect();
        self.inner.write().update(entries);
    }

    /// Removes `key`.
    ///
    /// # Errors
    ///
    /// [`CacheError::KeyNotFound`] if `key` is absent.
    pub fn delete(&self, key: &K) -> Result<(), CacheError> {
        self.pop(key).map(|_| ())
    }

    /// Removes `key` and returns its value.
    ///
    /// # Errors
    ///
    /// [`CacheError::KeyNotFound`] if `key` is absent.
    pub fn pop(&self, key: &K) -> Result<Arc<V>, CacheError> {
        self.inner.write().remove(key).ok_or(CacheError::KeyNotFound)
    }

    /// Removes `key` and returns its value, or `default` if absent.
    pub fn pop_or(&self, key: &K, default: V) -> Arc<V> {
        self.inner
            .write()
            .remove(key)
            .unwrap_or_else(|| Arc::new(default))
    }

    /// Removes and returns the newest entry.
    ///
    /// # Errors
    ///
    /// [`CacheError::KeyNotFound`] if the cache is empty.
    pub fn pop_item(&self) -> Result<(K, Arc<V>), CacheError> {
        self.inner.write().pop_newest().ok_or(CacheError::KeyNotFound)
    }

    /// Removes and returns the oldest entry, the next eviction candidate.
    pub fn pop_oldest(&self) -> Option<(K, Arc<V>)> {
        self.inner.write().pop_oldest()
    }

    /// Returns the oldest entry without removing it.
    pub fn peek_oldest(&self) -> Option<(K, Arc<V>)> {
        let cache = self.inner.read();
        cache.peek_oldest().map(|(k, v)| (k.clone(), Arc::clone(v)))
    }

    /// Returns the value for `key` without reordering or counting.
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        self.inner.read().peek(key)
    }

    /// Moves `key` to the newest position without counting a hit.
    pub fn touch(&self, key: &K) -> bool {
        self.inner.write().touch(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.read().contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    /// Drops every entry. Counters are kept.
    pub fn clear(&self) {
        self.inner.write().clear()
    }

    /// Returns an independent cache with the same capacity, loader and
    /// entries (oldest to newest). Counters start at zero.
    ///
    /// # Example
    ///
    /// ```
    /// use boundcache::Lru;
    ///
    /// let original: Lru<u8, u8> = Lru::try_new(4).unwrap();
    /// original.set(1, 10);
    /// let copy = original.copy();
    /// copy.set(2, 20);
    /// assert!(!original.contains(&2));
    /// assert_eq!(copy.hit_count(), 0);
    /// ```
    pub fn copy(&self) -> Self {
        let core = self.inner.read().copy();
        Self::from_core(core, self.on_miss.clone())
    }

    /// Iterates `(key, value)` pairs from oldest to newest.
    ///
    /// The iterator holds the read lock until dropped, so writers on other
    /// threads wait. Do not call into this cache at all from the iterating
    /// thread while the iterator is alive: read locks are not recursive, so
    /// even `len` or `peek` can deadlock once a writer is queued.
    pub fn iter(&self) -> Iter<'_, K, V, P> {
        let guard = self.inner.read();
        let cursor = guard.list().oldest_id();
        let remaining = guard.len();
        Iter {
            guard,
            cursor,
            remaining,
        }
    }

    /// Owned copy of all entries, oldest to newest.
    pub fn snapshot(&self) -> Vec<(K, Arc<V>)> {
        self.iter().collect()
    }

    /// Owned copy of all keys, oldest to newest.
    pub fn keys(&self) -> Vec<K> {
        self.inner.read().keys()
    }

    /// Checks the index and recency list under the read lock.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.read().check_invariants()
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.read().stats()
    }

    pub fn hit_count(&self) -> u64 {
        self.stats().hit_count
    }

    pub fn miss_count(&self) -> u64 {
        self.stats().miss_count
    }

    pub fn soft_miss_count(&self) -> u64 {
        self.stats().soft_miss_count
    }

    /// Policy name, `"lri"` or `"lru"`.
    pub fn policy_name(&self) -> &'static str {
        P::NAME
    }
}

#[cfg(feature = "metrics")]
impl<K, V, P> BoundedCache<K, V, P>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Send + Sync,
    P: RecencyPolicy,
{
    pub fn metrics_snapshot(&self) -> RecencyMetricsSnapshot {
        self.inner.read().metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<K, V, P> MetricsSnapshotProvider<RecencyMetricsSnapshot> for BoundedCache<K, V, P>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Send + Sync,
    P: RecencyPolicy,
{
    fn snapshot(&self) -> RecencyMetricsSnapshot {
        self.metrics_snapshot()
    }
}

/// Read-locked iterator over a [`BoundedCache`], oldest to newest.
pub struct Iter<'a, K, V, P> {
    guard: RwLockReadGuard<'a, RecencyCore<K, V, P>>,
    cursor: Option<SlotId>,
    remaining: usize,
}

impl<K, V, P> Iterator for Iter<'_, K, V, P>
where
    K: Eq + Hash + Clone,
    P: RecencyPolicy,
{
    type Item = (K, Arc<V>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let list = self.guard.list();
        let (key, value) = list.get(id)?;
        let item = (key.clone(), Arc::clone(value));
        self.cursor = list.successor(id);
        self.remaining = self.remaining.saturating_sub(1);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, P> ExactSizeIterator for Iter<'_, K, V, P>
where
    K: Eq + Hash + Clone,
    P: RecencyPolicy,
{
}

impl<'a, K, V, P> IntoIterator for &'a BoundedCache<K, V, P>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Send + Sync,
    P: RecencyPolicy,
{
    type Item = (K, Arc<V>);
    type IntoIter = Iter<'a, K, V, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, P> Extend<(K, V)> for BoundedCache<K, V, P>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Send + Sync,
    P: RecencyPolicy,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        self.update(iter);
    }
}

/// Equal when both caches map the same keys to equal values, regardless of
/// policy, order, counters or loader.
///
/// One side is snapshotted before the other is locked, so comparing two
/// caches never holds both locks.
impl<K, V, P, Q> PartialEq<BoundedCache<K, V, Q>> for BoundedCache<K, V, P>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: PartialEq + Send + Sync,
    P: RecencyPolicy,
    Q: RecencyPolicy,
{
    fn eq(&self, other: &BoundedCache<K, V, Q>) -> bool {
        if Arc::as_ptr(&self.inner) as *const () == Arc::as_ptr(&other.inner) as *const () {
            return true;
        }
        let mine = self.snapshot();
        let theirs = other.inner.read();
        mine.len() == theirs.len()
            && mine
                .iter()
                .all(|(key, value)| theirs.peek(key).is_some_and(|v| **value == *v))
    }
}

impl<K, V, P> Clone for BoundedCache<K, V, P> {
    /// Returns a handle to the same storage.
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            on_miss: self.on_miss.clone(),
        }
    }
}

impl<K, V, P> Default for BoundedCache<K, V, P>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Send + Sync,
    P: RecencyPolicy,
{
    /// Creates a cache with the default capacity of 128.
    fn default() -> Self {
        Self::new(crate::builder::DEFAULT_CAPACITY)
    }
}

impl<K, V, P> fmt::Debug for BoundedCache<K, V, P>
where
    K: fmt::Debug,
    V: fmt::Debug,
    P: RecencyPolicy,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.read();
        f.debug_struct("BoundedCache")
            .field("core", &*cache)
            .field("on_miss", &self.on_miss.is_some())
            .finish()
    }
}

impl<K, V, P> ConcurrentCache for BoundedCache<K, V, P>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Send + Sync,
    P: RecencyPolicy,
{
}
