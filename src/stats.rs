//! Hit/miss accounting carried by every cache.
//!
//! - `hit_count`: lookups that found the key.
//! - `miss_count`: lookups that did not, whether the miss was then loaded,
//!   defaulted or returned as an error.
//! - `soft_miss_count`: misses resolved with a caller-supplied default. Soft
//!   misses are a subset of misses, so `soft_miss_count <= miss_count` holds
//!   as long as callers only go through the cache's own lookup methods.
//!
//! Counters only grow. `clear()` leaves them alone; a new cache (including a
//! copy) starts from zero.

/// Point-in-time view of a cache's lookup counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hit_count: u64,
    pub miss_count: u64,
    pub soft_miss_count: u64,
}

impl CacheStats {
    /// Total lookups counted (`hits + misses`).
    pub fn lookups(&self) -> u64 {
        self.hit_count + self.miss_count
    }

    /// Fraction of lookups that hit, or `None` before the first lookup.
    pub fn hit_ratio(&self) -> Option<f64> {
        let total = self.lookups();
        (total > 0).then(|| self.hit_count as f64 / total as f64)
    }

    /// Misses that ended in an error or a loader call rather than a default.
    pub fn hard_miss_count(&self) -> u64 {
        self.miss_count.saturating_sub(self.soft_miss_count)
    }

    #[inline]
    pub(crate) fn record_hit(&mut self) {
        self.hit_count += 1;
    }

    #[inline]
    pub(crate) fn record_miss(&mut self) {
        self.miss_count += 1;
    }

    #[inline]
    pub(crate) fn record_soft_miss(&mut self) {
        self.soft_miss_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_stats_have_no_ratio() {
        let stats = CacheStats::default();
        assert_eq!(stats.lookups(), 0);
        assert_eq!(stats.hit_ratio(), None);
    }

    #[test]
    fn ratio_and_hard_misses() {
        let mut stats = CacheStats::default();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        stats.record_soft_miss();

        assert_eq!(stats.lookups(), 4);
        assert_eq!(stats.hit_ratio(), Some(0.75));
        assert_eq!(stats.hard_miss_count(), 0);

        stats.record_miss();
        assert_eq!(stats.hard_miss_count(), 1);
    }
}
