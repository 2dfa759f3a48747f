//! Coalescing of concurrent identical requests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use kuvend_core::Result;
use tokio::sync::OnceCell;

type Flight<V> = Arc<OnceCell<Result<V>>>;

/// Runs at most one computation per key at a time.
///
/// Callers that arrive while a computation for the same key is in flight
/// wait for it and receive a clone of its outcome, error included. The
/// flight is forgotten once it settles, so a later call starts afresh.
/// If the leading caller is cancelled, the next waiter takes over.
pub struct SingleFlight<V> {
    flights: Mutex<HashMap<String, Flight<V>>>,
}

impl<V: Clone> SingleFlight<V> {
    pub fn new() -> Self {
        Self {
            flights: Mutex::new(HashMap::new()),
        }
    }

    pub async fn run<F, Fut>(&self, key: &str, compute: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        let flight = {
            let mut flights = self.flights.lock().unwrap_or_else(PoisonError::into_inner);
            let flight = flights.entry(key.to_string()).or_default();
            if flight.initialized() {
                log::debug!("Joining settled flight for {}", key);
            }
            Arc::clone(flight)
        };

        let outcome = flight.get_or_init(compute).await.clone();

        let mut flights = self.flights.lock().unwrap_or_else(PoisonError::into_inner);
        if flights.get(key).is_some_and(|current| Arc::ptr_eq(current, &flight)) {
            flights.remove(key);
        }

        outcome
    }

    /// Keys with a computation currently registered
    pub fn in_flight(&self) -> usize {
        self.flights
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<V: Clone> Default for SingleFlight<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuvend_core::KuvendError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_concurrent_calls_share_one_computation() {
        let flights: Arc<SingleFlight<String>> = Arc::new(SingleFlight::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let flights = Arc::clone(&flights);
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                flights
                    .run("k", || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok("value".to_string())
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "value");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(flights.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_errors_are_shared_then_forgotten() {
        let flights: SingleFlight<String> = SingleFlight::new();

        let err = flights
            .run("k", || async { Err(KuvendError::service_unavailable("down")) })
            .await
            .unwrap_err();
        assert_eq!(err, KuvendError::service_unavailable("down"));

        let ok = flights.run("k", || async { Ok("up".to_string()) }).await;
        assert_eq!(ok.unwrap(), "up");
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_coalesce() {
        let flights: SingleFlight<usize> = SingleFlight::new();
        let a = flights.run("a", || async { Ok(1) });
        let b = flights.run("b", || async { Ok(2) });

        let (a, b) = tokio::join!(a, b);
        assert_eq!((a.unwrap(), b.unwrap()), (1, 2));
    }
}
