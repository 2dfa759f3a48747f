//! In-memory TTL store with hit/miss accounting

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::entry::{CacheEntry, CacheValue, EntrySummary};
use crate::CacheStats;

/// Default TTL applied by `set` when none is given (5 minutes)
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Default, Clone, Copy)]
struct Counters {
    total_requests: u64,
    cache_hits: u64,
    cache_misses: u64,
}

struct StoreState<V> {
    entries: HashMap<String, CacheEntry<V>>,
    counters: Counters,
    default_ttl: Duration,
    enabled: bool,
}

/// Process-local key/value store with lazy expiry.
///
/// All operations take one store-wide lock, which serializes hit counting
/// and expiry deletes against concurrent `set`s. Nothing here blocks on I/O.
pub struct CacheStore<V> {
    state: Mutex<StoreState<V>>,
}

impl<V: CacheValue> CacheStore<V> {
    /// Create a store using [`DEFAULT_TTL`]
    pub fn new() -> Self {
        Self::with_default_ttl(DEFAULT_TTL)
    }

    /// Create a store with a custom default TTL (zero falls back to [`DEFAULT_TTL`])
    pub fn with_default_ttl(default_ttl: Duration) -> Self {
        let default_ttl = if default_ttl.is_zero() {
            log::warn!("Ignoring zero default TTL, using {:?}", DEFAULT_TTL);
            DEFAULT_TTL
        } else {
            default_ttl
        };

        Self {
            state: Mutex::new(StoreState {
                entries: HashMap::new(),
                counters: Counters::default(),
                default_ttl,
                enabled: true,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState<V>> {
        // Every critical section leaves the map consistent, so a panic
        // elsewhere never invalidates the state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Disable the store (no-op operations)
    pub fn disable(&self) {
        self.lock().enabled = false;
    }

    /// Enable the store
    pub fn enable(&self) {
        self.lock().enabled = true;
    }

    /// Check if the store is enabled
    pub fn is_enabled(&self) -> bool {
        self.lock().enabled
    }

    /// Store or replace `key`. Uses the default TTL when `ttl` is `None`.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let key = key.into();
        let mut state = self.lock();
        if !state.enabled {
            return;
        }

        let ttl = ttl.unwrap_or(state.default_ttl);
        log::debug!("Cache store: key={}, ttl={:?}", key, ttl);
        let entry = CacheEntry::new(key.clone(), value, ttl);
        state.entries.insert(key, entry);
    }

    /// Look up `key`.
    ///
    /// Always counts a request. An absent or expired key counts a miss (and
    /// the expired entry is deleted); a live key counts a hit on both the
    /// store and the entry.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut guard = self.lock();
        let state = &mut *guard;
        if !state.enabled {
            return None;
        }

        state.counters.total_requests += 1;
        let now = Instant::now();

        let expired = state.entries.get(key).map(|entry| entry.is_expired_at(now));

        match expired {
            None => {
                state.counters.cache_misses += 1;
                log::info!("Cache miss: {}", key);
                None
            }
            Some(true) => {
                state.entries.remove(key);
                state.counters.cache_misses += 1;
                log::info!("Cache miss (expired): {}", key);
                None
            }
            Some(false) => {
                let entry = state.entries.get_mut(key)?;
                entry.record_hit();
                state.counters.cache_hits += 1;
                log::info!("Cache hit: {}", key);
                Some(entry.value.clone())
            }
        }
    }

    /// Live value for `key` without counting a request or a hit.
    ///
    /// Expired entries read as absent and are left for `get` or `cleanup`.
    pub fn peek(&self, key: &str) -> Option<V> {
        let state = self.lock();
        if !state.enabled {
            return None;
        }
        state
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(Instant::now()))
            .map(|entry| entry.value.clone())
    }

    /// Explicitly invalidate `key`. Returns whether an entry was present.
    pub fn remove(&self, key: &str) -> bool {
        self.lock().entries.remove(key).is_some()
    }

    /// Delete every expired entry and return how many were removed.
    /// Stats counters are untouched.
    pub fn cleanup(&self) -> usize {
        let mut state = self.lock();
        let now = Instant::now();
        let before = state.entries.len();
        state.entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - state.entries.len();

        if removed > 0 {
            log::debug!("Removed {} expired cache entries", removed);
        }
        removed
    }

    /// Remove all entries. Request history counters are kept.
    pub fn clear(&self) {
        let mut state = self.lock();
        let removed = state.entries.len();
        state.entries.clear();
        log::info!("Cache cleared: {} entries", removed);
    }

    /// Change the TTL used by future `set` calls without an explicit TTL.
    ///
    /// A zero duration is rejected (returns `false`). Stored entries keep
    /// their own TTL.
    pub fn set_default_ttl(&self, ttl: Duration) -> bool {
        if ttl.is_zero() {
            log::warn!("Rejected non-positive default TTL");
            return false;
        }
        self.lock().default_ttl = ttl;
        true
    }

    pub fn default_ttl(&self) -> Duration {
        self.lock().default_ttl
    }

    /// Live (non-expired) entries at call time, sorted by key.
    pub fn list_entries(&self) -> Vec<EntrySummary> {
        let state = self.lock();
        let now = Instant::now();
        let mut rows: Vec<EntrySummary> = state
            .entries
            .values()
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.summary_at(now))
            .collect();
        rows.sort_by(|a, b| a.key.cmp(&b.key));
        rows
    }

    /// Approximate bytes held by all stored entries.
    ///
    /// This is a structural scan: expired entries that have not been swept
    /// yet are included, so the figure can overstate logical occupancy.
    pub fn total_size(&self) -> usize {
        self.lock().entries.values().map(|entry| entry.size_bytes()).sum()
    }

    /// Number of stored entries, including expired-but-unswept ones.
    pub fn entry_count(&self) -> usize {
        self.lock().entries.len()
    }

    /// Snapshot of the request counters and current occupancy.
    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        let total_size_bytes = state.entries.values().map(|entry| entry.size_bytes()).sum();

        CacheStats::from_counters(
            state.counters.total_requests,
            state.counters.cache_hits,
            state.counters.cache_misses,
            state.entries.len(),
            total_size_bytes,
        )
    }
}

impl<V: CacheValue> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::thread;

    fn store() -> CacheStore<String> {
        CacheStore::new()
    }

    #[test]
    fn test_set_then_get_is_hit() {
        let store = store();
        store.set("k", "v".to_string(), Some(Duration::from_secs(10)));

        assert_eq!(store.get("k"), Some("v".to_string()));

        let stats = store.stats();
        assert_eq!(stats.total_requests, 1);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.cache_misses, 0);
        assert_eq!(stats.hit_rate, 100.0);
    }

    #[test]
    fn test_missing_key_is_miss() {
        let store = store();

        assert_eq!(store.get("nope"), None);

        let stats = store.stats();
        assert_eq!(stats.total_requests, 1);
        assert_eq!(stats.cache_misses, 1);
        assert_eq!(stats.hit_rate, 0.0);
    }

    #[test]
    fn test_expired_entry_is_deleted_on_get() {
        let store: CacheStore<serde_json::Value> = CacheStore::new();
        store.set("a", json!({"x": 1}), Some(Duration::from_millis(50)));
        let misses_before = store.stats().cache_misses;

        thread::sleep(Duration::from_millis(60));

        assert_eq!(store.get("a"), None);
        assert_eq!(store.stats().cache_misses, misses_before + 1);
        assert_eq!(store.entry_count(), 0);
        assert!(store.list_entries().iter().all(|e| e.key != "a"));
    }

    #[test]
    fn test_set_replaces_entry_and_resets_hits() {
        let store = store();
        store.set("k", "old".to_string(), None);
        store.get("k");
        store.get("k");
        assert_eq!(store.list_entries()[0].hits, 2);

        store.set("k", "new".to_string(), None);

        let rows = store.list_entries();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].hits, 0);
        assert_eq!(store.get("k"), Some("new".to_string()));
    }

    #[test]
    fn test_cleanup_removes_exactly_expired() {
        let store = store();
        store.set("short1", "a".to_string(), Some(Duration::from_millis(20)));
        store.set("short2", "b".to_string(), Some(Duration::from_millis(20)));
        store.set("long", "c".to_string(), Some(Duration::from_secs(60)));

        thread::sleep(Duration::from_millis(40));

        assert_eq!(store.cleanup(), 2);
        assert_eq!(store.cleanup(), 0);
        assert_eq!(store.entry_count(), 1);
        assert_eq!(store.stats().total_requests, 0, "cleanup must not count requests");
    }

    #[test]
    fn test_clear_keeps_counters() {
        let store = store();
        store.set("k", "v".to_string(), None);
        store.get("k");
        store.get("missing");

        store.clear();

        let stats = store.stats();
        assert_eq!(stats.entries_stored, 0);
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.cache_misses, 1);
        assert_eq!(stats.hit_rate, 50.0);
    }

    #[test]
    fn test_default_ttl_changes_only_future_sets() {
        let store = store();
        store.set("before", "a".to_string(), None);

        assert!(store.set_default_ttl(Duration::from_millis(20)));
        assert!(!store.set_default_ttl(Duration::ZERO));
        assert_eq!(store.default_ttl(), Duration::from_millis(20));

        store.set("after", "b".to_string(), None);
        thread::sleep(Duration::from_millis(40));

        assert_eq!(store.get("before"), Some("a".to_string()));
        assert_eq!(store.get("after"), None);
    }

    #[test]
    fn test_zero_default_ttl_on_construction_falls_back() {
        let store: CacheStore<String> = CacheStore::with_default_ttl(Duration::ZERO);
        assert_eq!(store.default_ttl(), DEFAULT_TTL);
    }

    #[test]
    fn test_list_entries_skips_expired_but_size_counts_them() {
        let store = store();
        store.set("live", "a".to_string(), Some(Duration::from_secs(60)));
        store.set("dead", "b".to_string(), Some(Duration::from_millis(10)));

        thread::sleep(Duration::from_millis(30));

        let rows = store.list_entries();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, "live");
        assert!(rows[0].ttl_remaining_ms > 0);
        assert_eq!(rows[0].size_bytes, "live".len() + 3);

        // "live"+"\"a\"" and "dead"+"\"b\""
        assert_eq!(store.total_size(), 14);
    }

    #[test]
    fn test_disabled_store_is_noop() {
        let store = store();
        store.disable();
        assert!(!store.is_enabled());

        store.set("k", "v".to_string(), None);
        assert_eq!(store.get("k"), None);
        assert_eq!(store.stats().total_requests, 0);

        store.enable();
        assert_eq!(store.get("k"), None);
        assert_eq!(store.stats().cache_misses, 1);
    }

    #[test]
    fn test_peek_does_not_count() {
        let store = store();
        store.set("k", "v".to_string(), None);
        store.set("short", "s".to_string(), Some(Duration::from_millis(10)));
        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(store.peek("k"), Some("v".to_string()));
        assert_eq!(store.peek("short"), None);
        assert_eq!(store.peek("missing"), None);

        let stats = store.stats();
        assert_eq!(stats.total_requests, 0);
        assert_eq!(stats.cache_hits, 0);
        assert_eq!(store.list_entries()[0].hits, 0);
    }

    #[test]
    fn test_remove() {
        let store = store();
        store.set("k", "v".to_string(), None);

        assert!(store.remove("k"));
        assert!(!store.remove("k"));
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_concurrent_hits_are_not_lost() {
        let store = Arc::new(store());
        store.set("k", "v".to_string(), Some(Duration::from_secs(60)));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..100 {
                        assert!(store.get("k").is_some());
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let stats = store.stats();
        assert_eq!(stats.total_requests, 800);
        assert_eq!(stats.cache_hits, 800);
        assert_eq!(store.list_entries()[0].hits, 800);
    }
}
