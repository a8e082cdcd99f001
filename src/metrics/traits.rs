//! # Metrics Trait Hierarchy
//!
//! Recording, snapshotting and exporting are split into small traits so that
//! cache logic only ever writes counters.
//!
//! ```text
//!   ┌─────────────────────────────┐
//!   │     CoreMetricsRecorder     │
//!   │  insert/evict/clear         │
//!   └──────────────┬──────────────┘
//!                  │
//!                  ▼
//!   ┌─────────────────────────────┐
//!   │   RecencyMetricsRecorder    │
//!   │  remove                     │
//!   └─────────────────────────────┘
//!
//!   Consumption (decoupled from recording):
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ (bench/test)                 │    │ (production monitoring)      │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```
//!
//! Hit, miss and soft-miss counts are not recorded here: every cache already
//! keeps them in [`CacheStats`](crate::stats::CacheStats), and snapshots copy
//! them from there.

/// Counters shared by every cache.
pub trait CoreMetricsRecorder {
    fn record_insert_call(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_clear(&mut self);
}

/// Counters specific to recency-list caches.
pub trait RecencyMetricsRecorder: CoreMetricsRecorder {
    /// An entry left through `remove`, `pop_oldest` or `pop_newest`.
    fn record_remove(&mut self);
}

/// Produces a point-in-time snapshot of a cache's metrics.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Publishes snapshots to a monitoring backend.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
