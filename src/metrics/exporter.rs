use std::io::Write;
use std::sync::Mutex;

use crate::metrics::snapshot::RecencyMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for cache metrics snapshots.
///
/// Writes the Prometheus text exposition format, labelling every sample with
/// the cache policy. Write errors are ignored; a poisoned writer is reused.
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send + Sync> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send + Sync> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_sample(&self, kind: &str, name: &str, policy: &str, value: u64) {
        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = writeln!(writer, "# TYPE {} {}", name, kind);
        let _ = writeln!(writer, "{}{{policy=\"{}\"}} {}", name, policy, value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send + Sync> MetricsExporter<RecencyMetricsSnapshot>
    for PrometheusTextExporter<W>
{
    fn export(&self, snapshot: &RecencyMetricsSnapshot) {
        let counters = [
            ("get_hits_total", snapshot.get_hits),
            ("get_misses_total", snapshot.get_misses),
            ("soft_misses_total", snapshot.soft_misses),
            ("insert_calls_total", snapshot.insert_calls),
            ("insert_updates_total", snapshot.insert_updates),
            ("insert_new_total", snapshot.insert_new),
            ("evicted_entries_total", snapshot.evicted_entries),
            ("removals_total", snapshot.removals),
            ("clears_total", snapshot.clears),
        ];
        for (suffix, value) in counters {
            self.write_sample("counter", &self.metric_name(suffix), snapshot.policy, value);
        }

        let gauges = [
            ("cache_len", snapshot.cache_len),
            ("capacity", snapshot.capacity),
        ];
        for (suffix, value) in gauges {
            self.write_sample(
                "gauge",
                &self.metric_name(suffix),
                snapshot.policy,
                value as u64,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exports_prefixed_labelled_samples() {
        let exporter = PrometheusTextExporter::new("boundcache", Vec::new());
        let snapshot = RecencyMetricsSnapshot {
            policy: "lru",
            get_hits: 3,
            get_misses: 1,
            soft_misses: 1,
            evicted_entries: 2,
            cache_len: 2,
            capacity: 2,
            ..Default::default()
        };
        exporter.export(&snapshot);

        let text = String::from_utf8(exporter.into_inner()).unwrap();
        assert!(text.contains("# TYPE boundcache_get_hits_total counter"));
        assert!(text.contains("boundcache_get_hits_total{policy=\"lru\"} 3"));
        assert!(text.contains("boundcache_soft_misses_total{policy=\"lru\"} 1"));
        assert!(text.contains("# TYPE boundcache_capacity gauge"));
        assert!(text.contains("boundcache_cache_len{policy=\"lru\"} 2"));
    }

    #[test]
    fn empty_prefix_uses_bare_names() {
        let exporter = PrometheusTextExporter::new("", Vec::new());
        exporter.export(&RecencyMetricsSnapshot {
            policy: "lri",
            ..Default::default()
        });
        let text = String::from_utf8(exporter.into_inner()).unwrap();
        assert!(text.contains("\nclears_total{policy=\"lri\"} 0"));
    }
}
