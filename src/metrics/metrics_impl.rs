use crate::metrics::traits::{CoreMetricsRecorder, RecencyMetricsRecorder};

/// Operation counters for a [`RecencyCore`](crate::policy::engine::RecencyCore).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecencyMetrics {
    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,
    pub evicted_entries: u64,
    pub removals: u64,
    pub clears: u64,
}

impl CoreMetricsRecorder for RecencyMetrics {
    fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }

    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }

    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }

    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    fn record_clear(&mut self) {
        self.clears += 1;
    }
}

impl RecencyMetricsRecorder for RecencyMetrics {
    fn record_remove(&mut self) {
        self.removals += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_increments_matching_counters() {
        let mut metrics = RecencyMetrics::default();
        metrics.record_insert_call();
        metrics.record_insert_call();
        metrics.record_insert_new();
        metrics.record_insert_update();
        metrics.record_evicted_entry();
        metrics.record_remove();
        metrics.record_clear();

        assert_eq!(
            metrics,
            RecencyMetrics {
                insert_calls: 2,
                insert_updates: 1,
                insert_new: 1,
                evicted_entries: 1,
                removals: 1,
                clears: 1,
            }
        );
    }
}
