//! Cache configuration and builder.
//!
//! [`CacheConfig`] carries the plain construction parameters; [`CacheBuilder`]
//! adds initial values and a miss loader, validates, and builds either policy.
//!
//! ## Example
//!
//! ```rust
//! use boundcache::builder::CacheBuilder;
//!
//! let cache = CacheBuilder::new(2)
//!     .values([("a", 1), ("b", 2), ("c", 3)])
//!     .on_miss(|_| Ok(0))
//!     .build_lru()
//!     .unwrap();
//!
//! // Initial values go through `set`, so only the last two survive.
//! assert_eq!(cache.keys(), vec!["b", "c"]);
//! assert_eq!(*cache.get(&"zzz").unwrap(), 0);
//! ```

use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::error::{ConfigError, MissError};
#[cfg(feature = "concurrency")]
use crate::policy::concurrent::{BoundedCache, OnMiss};
use crate::policy::engine::RecencyCore;
#[cfg(feature = "concurrency")]
use crate::policy::lri::Lri;
#[cfg(feature = "concurrency")]
use crate::policy::lru::Lru;
use crate::policy::RecencyPolicy;

/// Capacity used when none is given.
pub const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(128) {
    Some(capacity) => capacity,
    None => panic!("default capacity must be non-zero"),
};

/// Plain construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of live entries; must be greater than zero.
    pub capacity: usize,
    /// Reserve index and arena space for `capacity` entries up front.
    pub prealloc: bool,
}

impl CacheConfig {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            prealloc: false,
        }
    }

    /// Checks the parameters, returning the capacity as `NonZeroUsize`.
    pub fn validate(&self) -> Result<NonZeroUsize, ConfigError> {
        NonZeroUsize::new(self.capacity).ok_or_else(ConfigError::zero_capacity)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY.get())
    }
}

/// Builder for [`RecencyCore`] and [`BoundedCache`].
pub struct CacheBuilder<K, V> {
    config: CacheConfig,
    values: Vec<(K, V)>,
    on_miss: Option<Arc<dyn Fn(&K) -> Result<V, MissError> + Send + Sync>>,
}

impl<K, V> CacheBuilder<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Starts a builder for a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self::from_config(CacheConfig::new(capacity))
    }

    pub fn from_config(config: CacheConfig) -> Self {
        Self {
            config,
            values: Vec::new(),
            on_miss: None,
        }
    }

    pub fn prealloc(mut self, prealloc: bool) -> Self {
        self.config.prealloc = prealloc;
        self
    }

    /// Adds one initial entry.
    pub fn value(mut self, key: K, value: V) -> Self {
        self.values.push((key, value));
        self
    }

    /// Adds initial entries, stored in iteration order.
    pub fn values<I>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.values.extend(values);
        self
    }

    /// Sets the loader called on a hard miss.
    ///
    /// Only caches built with [`try_build`](Self::try_build) use it;
    /// [`try_build_core`](Self::try_build_core) ignores it.
    pub fn on_miss<F>(mut self, loader: F) -> Self
    where
        F: Fn(&K) -> Result<V, MissError> + Send + Sync + 'static,
    {
        self.on_miss = Some(Arc::new(loader));
        self
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Builds a single-threaded core with the initial values inserted.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the capacity is zero.
    pub fn try_build_core<P: RecencyPolicy>(self) -> Result<RecencyCore<K, V, P>, ConfigError> {
        let capacity = self.config.validate()?;
        let mut core = RecencyCore::with_prealloc(capacity, self.config.prealloc);
        core.update(
            self.values
                .into_iter()
                .map(|(key, value)| (key, Arc::new(value))),
        );
        Ok(core)
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> CacheBuilder<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Send + Sync,
{
    /// Builds a thread-safe cache with policy `P`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the capacity is zero.
    pub fn try_build<P: RecencyPolicy>(mut self) -> Result<BoundedCache<K, V, P>, ConfigError> {
        let on_miss: Option<OnMiss<K, V>> = self.on_miss.take();
        let core = self.try_build_core::<P>()?;
        Ok(BoundedCache::from_core(core, on_miss))
    }

    /// Builds a thread-safe LRI cache.
    pub fn build_lri(self) -> Result<Lri<K, V>, ConfigError> {
        self.try_build()
    }

    /// Builds a thread-safe LRU cache.
    pub fn build_lru(self) -> Result<Lru<K, V>, ConfigError> {
        self.try_build()
    }
}

impl<K, V> Default for CacheBuilder<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::from_config(CacheConfig::default())
    }
}

impl<K, V> fmt::Debug for CacheBuilder<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheBuilder")
            .field("config", &self.config)
            .field("values", &self.values.len())
            .field("on_miss", &self.on_miss.is_some())
            .finish()
    }
}
