//! Kuvend cache system
//!
//! This crate provides the process-local TTL cache that sits in front of the
//! reasoning cycle, the debate panel and the external generator. Losing the
//! cache never changes results, it only costs recomputation.

pub mod cleanup;
pub mod entry;
pub mod key;
pub mod storage;

pub use cleanup::{spawn_sweeper, CleanupTrigger};
pub use entry::{serialized_size, CacheEntry, CacheValue, EntrySummary};
pub use key::{KeyDeriver, DEFAULT_MODE, DEFAULT_PROMPT_PREFIX_CHARS, KEY_VERSION};
pub use storage::{CacheStore, DEFAULT_TTL};

use serde::{Deserialize, Serialize};

/// Cache statistics, derived from live counters and current map size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Percentage in `0..=100`
    pub hit_rate: f64,
    pub entries_stored: usize,
    pub total_size_bytes: usize,
}

impl CacheStats {
    /// Build stats from raw counters.
    ///
    /// `hit_rate = hits / max(1, requests) * 100`, so a cold store reports 0.
    pub fn from_counters(
        total_requests: u64,
        cache_hits: u64,
        cache_misses: u64,
        entries_stored: usize,
        total_size_bytes: usize,
    ) -> Self {
        let hit_rate = cache_hits as f64 / total_requests.max(1) as f64 * 100.0;

        Self {
            total_requests,
            cache_hits,
            cache_misses,
            hit_rate,
            entries_stored,
            total_size_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate_cold_start() {
        let stats = CacheStats::from_counters(0, 0, 0, 0, 0);
        assert_eq!(stats.hit_rate, 0.0);
    }

    #[test]
    fn test_hit_rate_matches_counters() {
        for (hits, misses) in [(1u64, 0u64), (1, 1), (3, 1), (0, 7), (2, 3)] {
            let stats = CacheStats::from_counters(hits + misses, hits, misses, 0, 0);
            let expected = 100.0 * hits as f64 / (hits + misses).max(1) as f64;
            assert!((stats.hit_rate - expected).abs() < 1e-9);
            assert!((0.0..=100.0).contains(&stats.hit_rate));
        }
    }

    #[test]
    fn test_stats_serialize() {
        let stats = CacheStats::from_counters(4, 3, 1, 2, 128);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["hit_rate"], 75.0);
        assert_eq!(json["entries_stored"], 2);
    }
}
