//! # Recency Cache Engine
//!
//! Single-threaded engine shared by the LRI and LRU policies.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                       RecencyCore<K, V, P>                           │
//!   │                                                                      │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │  FxHashMap<K, SlotId>  (index)                               │   │
//!   │   │     "a" ──────────────┐                                      │   │
//!   │   │     "b" ──────────────┼──────┐                               │   │
//!   │   │     "c" ──────────────┼──────┼──────┐                        │   │
//!   │   └───────────────────────┼──────┼──────┼────────────────────────┘   │
//!   │                           ▼      ▼      ▼                            │
//!   │   ┌──────────────────────────────────────────────────────────────┐   │
//!   │   │  RecencyList<K, Arc<V>>  (ring in a SlotArena)               │   │
//!   │   │                                                              │   │
//!   │   │   [anchor] ─► [a] ◄──► [b] ◄──► [c] ─► [anchor]              │   │
//!   │   │              oldest            newest                        │   │
//!   │   └──────────────────────────────────────────────────────────────┘   │
//!   │                                                                      │
//!   │   CacheStats { hit_count, miss_count, soft_miss_count }              │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Method               | Counters          | Reorders                       |
//! |----------------------|-------------------|--------------------------------|
//! | `lookup` / `get`     | hit or miss       | LRU hit → newest               |
//! | `insert`             | none              | always → newest; may evict     |
//! | `get_or_insert`      | hit, or miss+soft | as `lookup` / `insert`         |
//! | `peek` / `contains`  | none              | no                             |
//! | `touch`              | none              | → newest                       |
//! | `remove` / `pop_*`   | none              | unlinks                        |
//! | `clear`              | kept              | resets to anchor only          |
//!
//! All operations are O(1) except `iter`, `recency_rank`, `copy` and
//! equality, which are O(n).
//!
//! ## Eviction
//!
//! A full cache admits a new key by rotating the anchor (see
//! [`RecencyList::rotate_anchor`]): the oldest slot becomes the anchor and
//! the old anchor slot takes the new entry, so steady-state churn neither
//! allocates nor frees.
//!
//! ## Thread Safety
//!
//! `RecencyCore` is not synchronized. Share it through
//! [`BoundedCache`](crate::policy::concurrent::BoundedCache) or an external
//! lock.

use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::num::NonZeroUsize;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::ds::{RecencyIter, RecencyList, SlotId};
use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::RecencyMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::RecencyMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CoreMetricsRecorder, MetricsSnapshotProvider, RecencyMetricsRecorder,
};
use crate::policy::RecencyPolicy;
use crate::stats::CacheStats;
use crate::traits::{CoreCache, MutableCache, RecencyCacheTrait};

/// Bounded key → `Arc<V>` map with recency-ordered eviction.
pub struct RecencyCore<K, V, P> {
    index: FxHashMap<K, SlotId>,
    list: RecencyList<K, Arc<V>>,
    capacity: usize,
    stats: CacheStats,
    #[cfg(feature = "metrics")]
    metrics: RecencyMetrics,
    _policy: PhantomData<fn() -> P>,
}

impl<K, V, P> RecencyCore<K, V, P>
where
    K: Eq + Hash + Clone,
    P: RecencyPolicy,
{
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// # Example
    ///
    /// ```
    /// use std::num::NonZeroUsize;
    /// use boundcache::policy::lru::LruCore;
    /// use boundcache::traits::CoreCache;
    ///
    /// let cache: LruCore<u32, String> = LruCore::new(NonZeroUsize::new(64).unwrap());
    /// assert_eq!(cache.capacity(), 64);
    /// ```
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self::with_prealloc(capacity, false)
    }

    /// Like [`new`](Self::new), optionally reserving index and arena space
    /// for the full capacity up front.
    pub fn with_prealloc(capacity: NonZeroUsize, prealloc: bool) -> Self {
        let capacity = capacity.get();
        let reserve = if prealloc { capacity } else { 0 };
        Self {
            index: FxHashMap::with_capacity_and_hasher(reserve, Default::default()),
            list: RecencyList::with_capacity(reserve),
            capacity,
            stats: CacheStats::default(),
            #[cfg(feature = "metrics")]
            metrics: RecencyMetrics::default(),
            _policy: PhantomData,
        }
    }

    /// Fallible constructor for user-supplied capacities.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        NonZeroUsize::new(capacity)
            .map(Self::new)
            .ok_or_else(ConfigError::zero_capacity)
    }

    /// Looks up `key`, counting a hit or a miss.
    ///
    /// Under an access-order policy a hit promotes the entry to newest.
    pub fn lookup(&mut self, key: &K) -> Option<&Arc<V>> {
        let id = match self.index.get(key) {
            Some(&id) => id,
            None => {
                self.stats.record_miss();
                return None;
            },
        };
        self.stats.record_hit();
        if P::PROMOTE_ON_READ {
            self.list.move_to_newest(id);
        }
        self.list.get(id).map(|(_, value)| value)
    }

    /// Returns the value for `key` without reordering or counting.
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        let &id = self.index.get(key)?;
        self.list.get(id).map(|(_, value)| Arc::clone(value))
    }

    /// Returns the value for `key`, inserting `default` on a miss.
    ///
    /// A hit behaves like [`lookup`](Self::lookup). A miss counts one miss
    /// and one soft miss, then inserts `default` (possibly evicting).
    pub fn get_or_insert(&mut self, key: K, default: Arc<V>) -> Arc<V> {
        if let Some(value) = self.lookup(&key) {
            return Arc::clone(value);
        }
        self.stats.record_soft_miss();
        self.insert(key, Arc::clone(&default));
        default
    }

    /// Counts a miss that the caller resolved with a default value.
    ///
    /// Pair this with a prior [`lookup`](Self::lookup) miss; the miss itself
    /// is already counted there.
    pub fn record_soft_miss(&mut self) {
        self.stats.record_soft_miss();
    }

    /// Removes and returns the newest entry.
    pub fn pop_newest(&mut self) -> Option<(K, Arc<V>)> {
        let (key, value) = self.list.pop_newest()?;
        self.index.remove(&key);
        #[cfg(feature = "metrics")]
        self.metrics.record_remove();
        Some((key, value))
    }

    /// Returns the newest entry without removing it.
    pub fn peek_newest(&self) -> Option<(&K, &Arc<V>)> {
        self.list.newest()
    }

    /// Iterates entries from oldest to newest.
    pub fn iter(&self) -> RecencyIter<'_, K, Arc<V>> {
        self.list.iter()
    }

    pub(crate) fn list(&self) -> &RecencyList<K, Arc<V>> {
        &self.list
    }

    /// Keys from oldest to newest.
    pub fn keys(&self) -> Vec<K> {
        self.list.iter().map(|(key, _)| key.clone()).collect()
    }

    /// Lookup counters since construction.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Policy name, `"lri"` or `"lru"`.
    pub fn policy_name(&self) -> &'static str {
        P::NAME
    }

    /// Returns a new cache with the same capacity and the same entries in the
    /// same order. Counters start at zero; values are shared, not cloned.
    pub fn copy(&self) -> Self {
        let mut copy = Self {
            index: FxHashMap::with_capacity_and_hasher(self.len(), Default::default()),
            list: RecencyList::with_capacity(self.len()),
            capacity: self.capacity,
            stats: CacheStats::default(),
            #[cfg(feature = "metrics")]
            metrics: RecencyMetrics::default(),
            _policy: PhantomData,
        };
        for (key, value) in self.list.iter() {
            copy.insert(key.clone(), Arc::clone(value));
        }
        copy
    }

    /// Inserts every pair in iteration order, as repeated [`insert`] calls.
    ///
    /// [`insert`]: CoreCache::insert
    pub fn update<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, Arc<V>)>,
    {
        for (key, value) in entries {
            self.insert(key, value);
        }
    }

    /// Checks that the index and the recency list describe the same entries.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.list.check_invariants()?;
        if self.index.len() != self.list.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys, list holds {} entries",
                self.index.len(),
                self.list.len()
            )));
        }
        if self.index.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "{} entries exceed capacity {}",
                self.index.len(),
                self.capacity
            )));
        }
        for (key, &id) in &self.index {
            match self.list.get(id) {
                Some((stored, _)) if stored == key => {},
                Some(_) => return Err(InvariantError::new("index points at another key")),
                None => return Err(InvariantError::new("index points at a vacant slot")),
            }
        }
        Ok(())
    }

    /// Panics with the violated invariant if [`check_invariants`] fails.
    ///
    /// [`check_invariants`]: Self::check_invariants
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("recency cache invariant violated: {}", err);
        }
    }

    fn admit(&mut self, key: K, value: Arc<V>) {
        if self.list.len() < self.capacity {
            let id = self.list.push_newest(key.clone(), value);
            self.index.insert(key, id);
            return;
        }

        match self.list.rotate_anchor(key.clone(), value) {
            Ok(((evicted, _), id)) => {
                trace!(policy = P::NAME, capacity = self.capacity, "evicted oldest entry");
                self.index.remove(&evicted);
                self.index.insert(key, id);
                #[cfg(feature = "metrics")]
                self.metrics.record_evicted_entry();
            },
            Err((key, value)) => {
                let id = self.list.push_newest(key.clone(), value);
                self.index.insert(key, id);
            },
        }
    }
}

impl<K, V, P> CoreCache<K, Arc<V>> for RecencyCore<K, V, P>
where
    K: Eq + Hash + Clone,
    P: RecencyPolicy,
{
    /// Inserts or overwrites `key`; both cases leave it as the newest entry.
    fn insert(&mut self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if let Some(&id) = self.index.get(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();

            let previous = self
                .list
                .value_mut(id)
                .map(|slot| std::mem::replace(slot, value));
            self.list.move_to_newest(id);
            return previous;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        self.admit(key, value);
        None
    }

    fn get(&mut self, key: &K) -> Option<&Arc<V>> {
        self.lookup(key)
    }

    #[inline]
    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        trace!(policy = P::NAME, dropped = self.index.len(), "cleared cache");
        self.index.clear();
        self.list.clear();
    }
}

impl<K, V, P> MutableCache<K, Arc<V>> for RecencyCore<K, V, P>
where
    K: Eq + Hash + Clone,
    P: RecencyPolicy,
{
    fn remove(&mut self, key: &K) -> Option<Arc<V>> {
        let id = self.index.remove(key)?;
        #[cfg(feature = "metrics")]
        self.metrics.record_remove();
        self.list.remove(id).map(|(_, value)| value)
    }
}

impl<K, V, P> RecencyCacheTrait<K, Arc<V>> for RecencyCore<K, V, P>
where
    K: Eq + Hash + Clone,
    P: RecencyPolicy,
{
    fn pop_oldest(&mut self) -> Option<(K, Arc<V>)> {
        let (key, value) = self.list.pop_oldest()?;
        self.index.remove(&key);
        #[cfg(feature = "metrics")]
        self.metrics.record_remove();
        Some((key, value))
    }

    fn peek_oldest(&self) -> Option<(&K, &Arc<V>)> {
        self.list.oldest()
    }

    fn touch(&mut self, key: &K) -> bool {
        match self.index.get(key) {
            Some(&id) => self.list.move_to_newest(id),
            None => false,
        }
    }

    fn recency_rank(&self, key: &K) -> Option<usize> {
        let &target = self.index.get(key)?;
        let position = self.list.iter_ids().position(|id| id == target)?;
        Some(self.list.len() - 1 - position)
    }
}

#[cfg(feature = "metrics")]
impl<K, V, P> RecencyCore<K, V, P>
where
    K: Eq + Hash + Clone,
    P: RecencyPolicy,
{
    pub fn metrics_snapshot(&self) -> RecencyMetricsSnapshot {
        RecencyMetricsSnapshot {
            policy: P::NAME,
            get_hits: self.stats.hit_count,
            get_misses: self.stats.miss_count,
            soft_misses: self.stats.soft_miss_count,
            insert_calls: self.metrics.insert_calls,
            insert_new: self.metrics.insert_new,
            insert_updates: self.metrics.insert_updates,
            evicted_entries: self.metrics.evicted_entries,
            removals: self.metrics.removals,
            clears: self.metrics.clears,
            cache_len: self.index.len(),
            capacity: self.capacity,
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V, P> MetricsSnapshotProvider<RecencyMetricsSnapshot> for RecencyCore<K, V, P>
where
    K: Eq + Hash + Clone,
    P: RecencyPolicy,
{
    fn snapshot(&self) -> RecencyMetricsSnapshot {
        self.metrics_snapshot()
    }
}

/// Two caches are equal when they map the same keys to equal values,
/// whatever their policies, orders and counters.
impl<K, V, P, Q> PartialEq<RecencyCore<K, V, Q>> for RecencyCore<K, V, P>
where
    K: Eq + Hash + Clone,
    V: PartialEq,
    P: RecencyPolicy,
    Q: RecencyPolicy,
{
    fn eq(&self, other: &RecencyCore<K, V, Q>) -> bool {
        if std::ptr::eq(self as *const _ as *const (), other as *const _ as *const ()) {
            return true;
        }
        if self.len() != other.len() {
            return false;
        }
        self.list
            .iter()
            .all(|(key, value)| other.peek(key).is_some_and(|theirs| **value == *theirs))
    }
}

impl<K, V, P> Extend<(K, Arc<V>)> for RecencyCore<K, V, P>
where
    K: Eq + Hash + Clone,
    P: RecencyPolicy,
{
    fn extend<T: IntoIterator<Item = (K, Arc<V>)>>(&mut self, iter: T) {
        self.update(iter);
    }
}

impl<K, V, P> Default for RecencyCore<K, V, P>
where
    K: Eq + Hash + Clone,
    P: RecencyPolicy,
{
    /// Creates a cache with the default capacity of 128.
    fn default() -> Self {
        Self::new(crate::builder::DEFAULT_CAPACITY)
    }
}

struct Entries<'a, K, V>(&'a RecencyList<K, Arc<V>>);

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Entries<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

impl<K, V, P> fmt::Debug for RecencyCore<K, V, P>
where
    K: fmt::Debug,
    V: fmt::Debug,
    P: RecencyPolicy,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecencyCore")
            .field("policy", &P::NAME)
            .field("capacity", &self.capacity)
            .field("stats", &self.stats)
            .field("entries", &Entries(&self.list))
            .finish()
    }
}
