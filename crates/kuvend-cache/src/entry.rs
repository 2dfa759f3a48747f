//! Cache entry structure and size accounting

use std::fmt::Debug;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A value that can live in a [`CacheStore`](crate::CacheStore).
///
/// `approx_size` is the size-accounting hook used by `list_entries` and
/// `total_size`. It must never fail.
pub trait CacheValue: Clone + Send + Sync + 'static {
    fn approx_size(&self) -> usize;
}

/// Serialized JSON length of `value`, or the length of its `Debug`
/// rendering when serialization fails.
pub fn serialized_size<T: Serialize + Debug>(value: &T) -> usize {
    match serde_json::to_vec(value) {
        Ok(bytes) => bytes.len(),
        Err(e) => {
            log::debug!("Size fallback to debug rendering: {}", e);
            format!("{:?}", value).len()
        }
    }
}

impl CacheValue for String {
    fn approx_size(&self) -> usize {
        serialized_size(self)
    }
}

impl CacheValue for serde_json::Value {
    fn approx_size(&self) -> usize {
        serialized_size(self)
    }
}

/// A stored value with its expiry metadata.
///
/// Entries are replaced wholesale on `set`; only the hit counter changes
/// after insertion.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub key: String,
    pub value: V,
    /// Monotonic insertion time, used for expiry.
    pub stored_at: Instant,
    /// Wall-clock insertion time, for display.
    pub created_at: DateTime<Utc>,
    pub ttl: Duration,
    pub hits: u64,
}

impl<V: CacheValue> CacheEntry<V> {
    pub fn new(key: String, value: V, ttl: Duration) -> Self {
        Self {
            key,
            value,
            stored_at: Instant::now(),
            created_at: Utc::now(),
            ttl,
            hits: 0,
        }
    }

    /// Expired strictly after `stored_at + ttl`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) > self.ttl
    }

    pub fn age_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.stored_at)
    }

    pub fn ttl_remaining_at(&self, now: Instant) -> Duration {
        self.ttl.saturating_sub(self.age_at(now))
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Approximate footprint of key plus value.
    pub fn size_bytes(&self) -> usize {
        self.key.len() + self.value.approx_size()
    }

    pub fn summary_at(&self, now: Instant) -> EntrySummary {
        EntrySummary {
            key: self.key.clone(),
            hits: self.hits,
            age_ms: duration_ms(self.age_at(now)),
            ttl_remaining_ms: duration_ms(self.ttl_remaining_at(now)),
            size_bytes: self.size_bytes(),
            created_at: self.created_at,
        }
    }
}

/// One row of `list_entries`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrySummary {
    pub key: String,
    pub hits: u64,
    pub age_ms: u64,
    pub ttl_remaining_ms: u64,
    pub size_bytes: usize,
    pub created_at: DateTime<Utc>,
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_cache_entry_creation() {
        let entry = CacheEntry::new(
            "cycle|test".to_string(),
            "test response".to_string(),
            Duration::from_secs(60),
        );

        assert_eq!(entry.key, "cycle|test");
        assert_eq!(entry.value, "test response");
        assert_eq!(entry.hits, 0);
        assert!(!entry.is_expired_at(Instant::now()));
    }

    #[test]
    fn test_record_hit() {
        let mut entry = CacheEntry::new("k".to_string(), "v".to_string(), Duration::from_secs(1));

        entry.record_hit();
        assert_eq!(entry.hits, 1);

        entry.record_hit();
        assert_eq!(entry.hits, 2);
    }

    #[test]
    fn test_expiry_boundary() {
        let entry = CacheEntry::new("k".to_string(), "v".to_string(), Duration::from_millis(100));

        let exactly = entry.stored_at + Duration::from_millis(100);
        assert!(!entry.is_expired_at(exactly));
        assert!(entry.is_expired_at(exactly + Duration::from_millis(1)));
        assert_eq!(entry.ttl_remaining_at(exactly + Duration::from_secs(5)), Duration::ZERO);
    }

    #[test]
    fn test_size_includes_key_and_serialized_value() {
        let entry = CacheEntry::new("abc".to_string(), "hello".to_string(), Duration::from_secs(1));
        // "hello" serializes with quotes
        assert_eq!(entry.size_bytes(), 3 + 7);
    }

    #[test]
    fn test_serialized_size_falls_back_to_debug() {
        // JSON object keys must be strings, so tuple keys fail to serialize.
        let mut map: HashMap<(u8, u8), u8> = HashMap::new();
        map.insert((1, 2), 3);

        assert!(serde_json::to_vec(&map).is_err());
        assert_eq!(serialized_size(&map), format!("{:?}", map).len());
    }
}
