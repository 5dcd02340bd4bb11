//! Keyed, coalescing fetcher for the full session list.
//!
//! Plays the role of a data-fetching cache in front of
//! `SessionService::get_grouped_sessions`: concurrent identical requests share
//! one remote call, and the last result per key is kept for "ensure loaded"
//! reads.

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use lobe_core::Result;
use lobe_core::session::{ChatSessionList, SessionService};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Cache key of a session list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchKey {
    pub is_login: bool,
}

type SharedFetch = Shared<BoxFuture<'static, Result<ChatSessionList>>>;

struct InFlight {
    epoch: u64,
    future: SharedFetch,
}

/// Fetches and caches the session list.
pub struct SessionListFetcher {
    service: Arc<dyn SessionService>,
    in_flight: Mutex<HashMap<FetchKey, InFlight>>,
    cache: Mutex<HashMap<FetchKey, ChatSessionList>>,
    epoch: AtomicU64,
}

impl SessionListFetcher {
    pub fn new(service: Arc<dyn SessionService>) -> Self {
        Self {
            service,
            in_flight: Mutex::new(HashMap::new()),
            cache: Mutex::new(HashMap::new()),
            epoch: AtomicU64::new(0),
        }
    }

    /// Returns the last successful result for `key`, if any.
    pub fn cached(&self, key: FetchKey) -> Option<ChatSessionList> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }

    /// Marks every in-flight request as stale.
    ///
    /// Must be called after a remote mutation so that the following fetch
    /// does not join a request issued before the mutation landed.
    pub fn invalidate(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    /// Fetches the session list, joining an identical request still in flight.
    pub async fn fetch(&self, key: FetchKey) -> Result<ChatSessionList> {
        let epoch = self.epoch.load(Ordering::SeqCst);

        let future = {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            match in_flight.get(&key) {
                Some(pending) if pending.epoch == epoch => {
                    tracing::debug!("[SessionListFetcher] joining in-flight fetch {:?}", key);
                    pending.future.clone()
                }
                _ => {
                    let service = Arc::clone(&self.service);
                    let future = async move { service.get_grouped_sessions().await }
                        .boxed()
                        .shared();
                    in_flight.insert(
                        key,
                        InFlight {
                            epoch,
                            future: future.clone(),
                        },
                    );
                    future
                }
            }
        };

        let result = future.await;

        {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            if in_flight.get(&key).is_some_and(|p| p.epoch == epoch) {
                in_flight.remove(&key);
            }
        }

        if let Ok(list) = &result {
            self.cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key, list.clone());
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lobe_infrastructure::InMemorySessionService;
    use std::time::Duration;

    const KEY: FetchKey = FetchKey { is_login: true };

    #[tokio::test]
    async fn test_concurrent_fetches_share_one_request() {
        let service =
            Arc::new(InMemorySessionService::new().with_latency(Duration::from_millis(20)));
        let fetcher = SessionListFetcher::new(service.clone());

        let (a, b) = tokio::join!(fetcher.fetch(KEY), fetcher.fetch(KEY));

        assert!(a.is_ok());
        assert_eq!(a, b);
        assert_eq!(service.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_new_request() {
        let service =
            Arc::new(InMemorySessionService::new().with_latency(Duration::from_millis(20)));
        let fetcher = SessionListFetcher::new(service.clone());

        let first = fetcher.fetch(KEY);
        let second = async {
            tokio::task::yield_now().await;
            fetcher.invalidate();
            fetcher.fetch(KEY).await
        };
        let (a, b) = tokio::join!(first, second);

        assert!(a.is_ok() && b.is_ok());
        assert_eq!(service.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_sequential_fetches_hit_remote_each_time() {
        let service = Arc::new(InMemorySessionService::new());
        let fetcher = SessionListFetcher::new(service.clone());

        fetcher.fetch(KEY).await.unwrap();
        fetcher.fetch(KEY).await.unwrap();

        assert_eq!(service.fetch_count(), 2);
        assert!(fetcher.cached(KEY).is_some());
        assert!(fetcher.cached(FetchKey { is_login: false }).is_none());
    }
}
