//! # Instance Registry
//!
//! Memoizes instances by their construction arguments: asking twice with equal
//! arguments yields the same `Arc<T>` while the entry stays registered.
//!
//! Unlike [`BoundedCache`](crate::policy::concurrent::BoundedCache), the
//! registry is unbounded. Entries leave only through [`release`] or
//! [`purge_unshared`], which keeps lifetimes explicit.
//!
//! ```
//! use boundcache::registry::InstanceRegistry;
//!
//! let registry = InstanceRegistry::new(|url: &String| format!("engine({url})"));
//! let a = registry.get_or_create("sqlite://a".to_string());
//! let b = registry.get_or_create("sqlite://a".to_string());
//! assert!(std::sync::Arc::ptr_eq(&a, &b));
//!
//! drop((a, b));
//! assert_eq!(registry.purge_unshared(), 1);
//! assert!(registry.is_empty());
//! ```
//!
//! [`release`]: InstanceRegistry::release
//! [`purge_unshared`]: InstanceRegistry::purge_unshared

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

type Factory<A, T> = Arc<dyn Fn(&A) -> T + Send + Sync>;

/// Keyed registry of shared instances built by an injected factory.
pub struct InstanceRegistry<A, T> {
    factory: Factory<A, T>,
    instances: RwLock<FxHashMap<A, Arc<T>>>,
}

impl<A, T> InstanceRegistry<A, T>
where
    A: Eq + Hash,
{
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&A) -> T + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
            instances: RwLock::new(FxHashMap::default()),
        }
    }

    /// Returns the instance registered for `args`, building it first if
    /// needed.
    ///
    /// The factory runs without the registry lock held. When two threads race
    /// on the same arguments, both build, the first registration wins and
    /// both callers receive it.
    pub fn get_or_create(&self, args: A) -> Arc<T> {
        if let Some(existing) = self.instances.read().get(&args) {
            return Arc::clone(existing);
        }

        debug!("building registry instance");
        let built = Arc::new((self.factory)(&args));
        let mut instances = self.instances.write();
        Arc::clone(instances.entry(args).or_insert(built))
    }

    /// Unregisters `args`, returning its instance. Outstanding handles stay
    /// valid.
    pub fn release(&self, args: &A) -> Option<Arc<T>> {
        self.instances.write().remove(args)
    }

    /// Drops every instance that no caller holds any more. Returns how many
    /// were dropped.
    pub fn purge_unshared(&self) -> usize {
        let mut instances = self.instances.write();
        let before = instances.len();
        instances.retain(|_, instance| Arc::strong_count(instance) > 1);
        let purged = before - instances.len();
        if purged > 0 {
            debug!(purged, "purged unshared registry instances");
        }
        purged
    }

    pub fn contains(&self, args: &A) -> bool {
        self.instances.read().contains_key(args)
    }

    pub fn len(&self) -> usize {
        self.instances.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.read().is_empty()
    }

    /// Unregisters everything.
    pub fn clear(&self) {
        self.instances.write().clear();
    }
}

impl<A, T> fmt::Debug for InstanceRegistry<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceRegistry")
            .field("len", &self.instances.read().len())
            .finish_non_exhaustive()
    }
}
