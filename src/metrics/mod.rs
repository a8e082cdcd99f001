//! Optional operation metrics (feature `metrics`).
//!
//! ```
//! use std::sync::Arc;
//! use boundcache::metrics::exporter::PrometheusTextExporter;
//! use boundcache::metrics::traits::MetricsExporter;
//! use boundcache::policy::lri::LriCore;
//! use boundcache::traits::CoreCache;
//!
//! let mut cache = LriCore::try_new(1).unwrap();
//! cache.insert(1u32, Arc::new("a"));
//! cache.insert(2u32, Arc::new("b"));
//!
//! let snapshot = cache.metrics_snapshot();
//! assert_eq!(snapshot.evicted_entries, 1);
//!
//! let exporter = PrometheusTextExporter::new("app_cache", Vec::new());
//! exporter.export(&snapshot);
//! ```

pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
