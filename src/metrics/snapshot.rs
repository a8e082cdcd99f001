/// Point-in-time view of a recency cache's counters and gauges.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RecencyMetricsSnapshot {
    pub policy: &'static str,

    pub get_hits: u64,
    pub get_misses: u64,
    pub soft_misses: u64,

    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,

    pub evicted_entries: u64,
    pub removals: u64,
    pub clears: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub capacity: usize,
}

impl RecencyMetricsSnapshot {
    pub fn get_calls(&self) -> u64 {
        self.get_hits + self.get_misses
    }

    /// Hits over lookups, or `None` before the first lookup.
    pub fn hit_ratio(&self) -> Option<f64> {
        let calls = self.get_calls();
        (calls > 0).then(|| self.get_hits as f64 / calls as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_ratio_handles_empty_and_mixed() {
        let mut snapshot = RecencyMetricsSnapshot::default();
        assert_eq!(snapshot.hit_ratio(), None);

        snapshot.get_hits = 3;
        snapshot.get_misses = 1;
        assert_eq!(snapshot.get_calls(), 4);
        assert_eq!(snapshot.hit_ratio(), Some(0.75));
    }
}
