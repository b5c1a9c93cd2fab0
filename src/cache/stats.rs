//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, and evictions.

use serde::Serialize;

// == Stat Recorder ==
/// Mutable hit/miss/eviction counters owned by the cache core.
#[derive(Debug, Default)]
pub(crate) struct StatRecorder {
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl StatRecorder {
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Increments the eviction counter.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Resets all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Produces a point-in-time snapshot with the given map dimensions.
    pub fn snapshot(&self, size: usize, max_size: usize) -> CacheStats {
        CacheStats {
            size,
            max_size,
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            hit_rate: hit_rate_percent(self.hits, self.misses),
        }
    }
}

/// Hit rate as a percentage rounded to two decimals, 0.0 before any request.
fn hit_rate_percent(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        return 0.0;
    }
    (hits as f64 / total as f64 * 10_000.0).round() / 100.0
}

// == Cache Stats ==
/// Point-in-time view of cache performance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    /// Current number of entries in the cache
    pub size: usize,
    /// Maximum number of entries the cache can hold
    pub max_size: usize,
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Number of entries evicted due to LRU pressure
    pub evictions: u64,
    /// Hit percentage, rounded to two decimals
    pub hit_rate: f64,
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_starts_at_zero() {
        let recorder = StatRecorder::default();
        let stats = recorder.snapshot(0, 10);

        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.size, 0);
        assert_eq!(stats.max_size, 10);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let recorder = StatRecorder::default();
        assert_eq!(recorder.snapshot(0, 10).hit_rate, 0.0);
    }

    #[test]
    fn test_hit_rate_all_hits() {
        let mut recorder = StatRecorder::default();
        recorder.record_hit();
        recorder.record_hit();
        assert_eq!(recorder.snapshot(2, 10).hit_rate, 100.0);
    }

    #[test]
    fn test_hit_rate_all_misses() {
        let mut recorder = StatRecorder::default();
        recorder.record_miss();
        recorder.record_miss();
        assert_eq!(recorder.snapshot(0, 10).hit_rate, 0.0);
    }

    #[test]
    fn test_hit_rate_one_hit_one_miss() {
        let mut recorder = StatRecorder::default();
        recorder.record_hit();
        recorder.record_miss();
        assert_eq!(recorder.snapshot(1, 10).hit_rate, 50.0);
    }

    #[test]
    fn test_hit_rate_rounds_to_two_decimals() {
        let mut recorder = StatRecorder::default();
        recorder.record_hit();
        recorder.record_miss();
        recorder.record_miss();
        // 1/3 = 33.333...% rounds to 33.33
        assert_eq!(recorder.snapshot(1, 10).hit_rate, 33.33);
    }

    #[test]
    fn test_reset() {
        let mut recorder = StatRecorder::default();
        recorder.record_hit();
        recorder.record_miss();
        recorder.record_eviction();

        recorder.reset();

        let stats = recorder.snapshot(0, 10);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.evictions, 0);
    }

    #[test]
    fn test_stats_serialize() {
        let mut recorder = StatRecorder::default();
        recorder.record_hit();

        let json = serde_json::to_string(&recorder.snapshot(1, 10)).unwrap();
        assert!(json.contains("\"hit_rate\":100.0"));
        assert!(json.contains("\"max_size\":10"));
    }
}
