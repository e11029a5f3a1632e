// src/services/cache.rs
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use log::debug;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::errors::FetchError;

type SharedFetch<V> = Shared<BoxFuture<'static, Result<V, FetchError>>>;

enum Slot<V: Clone> {
    Fresh { value: V, stored_at: Instant },
    InFlight(SharedFetch<V>),
}

/// Request cache keyed by endpoint + params.
///
/// Consumers asking for the same key while a request is running await that
/// same request. Successful results are served from memory until `ttl` has
/// passed; failures are never stored.
pub struct RequestCache<V: Clone> {
    ttl: Duration,
    slots: Mutex<HashMap<String, Slot<V>>>,
}

impl<V> RequestCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key`, joins a running request for it, or
    /// starts `fetch`.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<V, FetchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
    {
        let pending = {
            let mut slots = self.slots.lock().await;
            let running = match slots.get(key) {
                Some(Slot::Fresh { value, stored_at }) if stored_at.elapsed() < self.ttl => {
                    debug!("Cache hit for {}", key);
                    return Ok(value.clone());
                }
                Some(Slot::InFlight(shared)) => Some(shared.clone()),
                _ => None,
            };
            match running {
                Some(shared) => {
                    debug!("Joining in-flight request for {}", key);
                    shared
                }
                None => {
                    debug!("Cache miss for {}", key);
                    let shared = fetch().boxed().shared();
                    slots.insert(key.to_string(), Slot::InFlight(shared.clone()));
                    shared
                }
            }
        };

        let result = pending.clone().await;

        // Only the request still registered for `key` may settle the slot; a
        // request superseded by `invalidate` leaves the newer one alone.
        let mut slots = self.slots.lock().await;
        let current = matches!(slots.get(key), Some(Slot::InFlight(shared)) if shared.ptr_eq(&pending));
        if current {
            match &result {
                Ok(value) => {
                    slots.insert(
                        key.to_string(),
                        Slot::Fresh { value: value.clone(), stored_at: Instant::now() },
                    );
                }
                Err(_) => {
                    slots.remove(key);
                }
            }
        }
        result
    }

    /// Drops whatever is stored for `key` so the next request refetches.
    pub async fn invalidate(&self, key: &str) {
        self.slots.lock().await.remove(key);
    }

    /// Last stored value for `key`, fresh or not.
    pub async fn peek(&self, key: &str) -> Option<V> {
        match self.slots.lock().await.get(key) {
            Some(Slot::Fresh { value, .. }) => Some(value.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn concurrent_consumers_share_one_request() {
        let cache = Arc::new(RequestCache::new(Duration::from_secs(60)));
        let calls = Arc::new(AtomicU32::new(0));

        let fetch = |calls: Arc<AtomicU32>| {
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(500)).await;
                Ok::<_, FetchError>(42.0)
            }
        };

        let (a, b) = tokio::join!(
            cache.get_or_fetch("price", fetch(calls.clone())),
            cache.get_or_fetch("price", fetch(calls.clone())),
        );

        assert_eq!(a, Ok(42.0));
        assert_eq!(b, Ok(42.0));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_after_ttl() {
        let cache = RequestCache::new(Duration::from_secs(60));

        assert_eq!(cache.get_or_fetch("k", || async { Ok(1) }).await, Ok(1));
        assert_eq!(cache.get_or_fetch("k", || async { Ok(2) }).await, Ok(1));

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(cache.get_or_fetch("k", || async { Ok(3) }).await, Ok(3));
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cache: RequestCache<u32> = RequestCache::new(Duration::from_secs(60));

        let first = cache
            .get_or_fetch("k", || async { Err(FetchError::RateLimited) })
            .await;
        assert_eq!(first, Err(FetchError::RateLimited));
        assert_eq!(cache.peek("k").await, None);

        assert_eq!(cache.get_or_fetch("k", || async { Ok(7) }).await, Ok(7));
        assert_eq!(cache.peek("k").await, Some(7));
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let cache = RequestCache::new(Duration::from_secs(60));
        cache.get_or_fetch("k", || async { Ok("old") }).await.unwrap();

        cache.invalidate("k").await;
        assert_eq!(cache.get_or_fetch("k", || async { Ok("new") }).await, Ok("new"));
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_request_does_not_overwrite_newer_value() {
        let cache = Arc::new(RequestCache::new(Duration::from_secs(60)));

        let slow = {
            let cache = cache.clone();
            tokio::spawn(async move {
                cache
                    .get_or_fetch("k", || async {
                        tokio::time::sleep(Duration::from_millis(500)).await;
                        Ok("old")
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        cache.invalidate("k").await;
        assert_eq!(cache.get_or_fetch("k", || async { Ok("new") }).await, Ok("new"));

        assert_eq!(slow.await.unwrap(), Ok("old"));
        assert_eq!(cache.peek("k").await, Some("new"));
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_failure_keeps_newer_request_in_flight() {
        let cache = Arc::new(RequestCache::new(Duration::from_secs(60)));
        let calls = Arc::new(AtomicU32::new(0));

        let failing = {
            let cache = cache.clone();
            tokio::spawn(async move {
                cache
                    .get_or_fetch("k", || async {
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        Err::<u32, _>(FetchError::RateLimited)
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        cache.invalidate("k").await;

        let newer = {
            let cache = cache.clone();
            let calls = calls.clone();
            tokio::spawn(async move {
                cache
                    .get_or_fetch("k", move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(500)).await;
                        Ok(7)
                    })
                    .await
            })
        };

        assert_eq!(failing.await.unwrap(), Err(FetchError::RateLimited));

        // The newer request is still running and must be joined, not repeated.
        let joined = {
            let calls = calls.clone();
            cache.get_or_fetch("k", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(8)
            })
        };
        assert_eq!(joined.await, Ok(7));
        assert_eq!(newer.await.unwrap(), Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let cache = RequestCache::new(Duration::from_secs(60));
        cache.get_or_fetch("a", || async { Ok(1) }).await.unwrap();
        assert_eq!(cache.get_or_fetch("b", || async { Ok(2) }).await, Ok(2));
        assert_eq!(cache.peek("a").await, Some(1));
    }
}
