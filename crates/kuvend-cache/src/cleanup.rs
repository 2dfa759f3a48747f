//! Expired-entry sweeping

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::entry::CacheValue;
use crate::storage::CacheStore;

/// When expired entries are swept, besides lazy eviction on `get`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CleanupTrigger {
    /// Only on explicit `cleanup()` calls
    #[default]
    Manual,

    /// Sweep on a fixed interval
    Periodic { interval_secs: u64 },
}

impl CleanupTrigger {
    /// Interval of the periodic sweep, if any
    pub fn interval(&self) -> Option<Duration> {
        match self {
            CleanupTrigger::Manual => None,
            CleanupTrigger::Periodic { interval_secs } => {
                Some(Duration::from_secs((*interval_secs).max(1)))
            }
        }
    }

    /// Start the sweeper this trigger asks for. Must be called inside a tokio runtime.
    pub fn spawn<V: CacheValue>(&self, store: Arc<CacheStore<V>>) -> Option<JoinHandle<()>> {
        self.interval().map(|interval| spawn_sweeper(store, interval))
    }
}

/// Run `cleanup()` on `store` every `interval` until the task is aborted.
///
/// The sweeper never touches request counters. The first sweep happens one
/// full interval after the call.
pub fn spawn_sweeper<V: CacheValue>(store: Arc<CacheStore<V>>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let removed = store.cleanup();
            if removed > 0 {
                log::info!("Periodic sweep removed {} expired entries", removed);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_interval() {
        assert_eq!(CleanupTrigger::Manual.interval(), None);
        assert_eq!(
            CleanupTrigger::Periodic { interval_secs: 30 }.interval(),
            Some(Duration::from_secs(30))
        );
        assert_eq!(
            CleanupTrigger::Periodic { interval_secs: 0 }.interval(),
            Some(Duration::from_secs(1))
        );
    }

    #[test]
    fn test_trigger_serde() {
        let trigger: CleanupTrigger =
            serde_json::from_str(r#"{"type":"periodic","interval_secs":5}"#).unwrap();
        assert_eq!(trigger, CleanupTrigger::Periodic { interval_secs: 5 });
    }

    #[tokio::test]
    async fn test_sweeper_removes_expired_entries() {
        let store: Arc<CacheStore<String>> = Arc::new(CacheStore::new());
        store.set("short", "a".to_string(), Some(Duration::from_millis(10)));
        store.set("long", "b".to_string(), Some(Duration::from_secs(60)));

        let handle = spawn_sweeper(Arc::clone(&store), Duration::from_millis(30));
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        assert_eq!(store.entry_count(), 1);
        assert_eq!(store.stats().total_requests, 0);
    }

    #[tokio::test]
    async fn test_manual_trigger_spawns_nothing() {
        let store: Arc<CacheStore<String>> = Arc::new(CacheStore::new());
        assert!(CleanupTrigger::Manual.spawn(store).is_none());
    }
}
