//! Recency policies and the caches built on them.
//!
//! Both policies share one engine, [`RecencyCore`](engine::RecencyCore); they
//! differ only in whether a read hit promotes the entry.
//!
//! | Policy | Marker           | Read hit promotes | Write promotes | Evicts                  |
//! |--------|------------------|-------------------|----------------|-------------------------|
//! | LRI    | `InsertionOrder` | no                | yes            | least recently inserted |
//! | LRU    | `AccessOrder`    | yes               | yes            | least recently used     |

pub mod engine;
pub mod lri;
pub mod lru;

#[cfg(feature = "concurrency")]
pub mod concurrent;

pub use lri::InsertionOrder;
pub use lru::AccessOrder;

mod sealed {
    pub trait Sealed {}
}

/// Eviction-order policy for a recency cache.
///
/// Sealed: the engine relies on exactly the two behaviours below.
pub trait RecencyPolicy: sealed::Sealed + Send + Sync + 'static {
    /// Short policy name used in `Debug` output and metrics labels.
    const NAME: &'static str;

    /// Whether a read hit moves the entry to the newest position.
    const PROMOTE_ON_READ: bool;
}

impl sealed::Sealed for InsertionOrder {}
impl sealed::Sealed for AccessOrder {}
