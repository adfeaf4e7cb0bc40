//! Query cache - Keyed request cache with freshness windows
//!
//! Each logical query maps to one entry, keyed by the query's parameters.
//! Entries stay fresh for a configured window; later accesses trigger a new
//! request. A stale entry is served as-is while it is refreshed in the
//! background; only entries without data make the caller wait. Concurrent
//! requests for the same key share a single in-flight fetch, which runs on
//! its own task so an abandoned caller does not cancel it. Failures are
//! stored, never retried automatically.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::application::ports::outbound::FetchError;

type SharedFetch<V> = Shared<BoxFuture<'static, Result<V, FetchError>>>;

/// Lifecycle state of a cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// First request still running
    Pending,
    Fresh,
    Stale,
}

/// Point-in-time copy of one cache entry
#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    pub key: K,
    pub data: Option<V>,
    pub error: Option<FetchError>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub state: EntryState,
}

/// What a consumer sees for one query
#[derive(Debug, Clone)]
pub struct QueryState<V> {
    pub data: Option<V>,
    pub error: Option<FetchError>,
    /// A request is running and there is no data to show yet
    pub is_loading: bool,
    /// A request is running, possibly alongside older data
    pub is_fetching: bool,
}

impl<V> QueryState<V> {
    /// State of a query that is disabled or never requested
    pub fn idle() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: false,
            is_fetching: false,
        }
    }

    pub fn is_success(&self) -> bool {
        self.data.is_some() && self.error.is_none()
    }
}

struct Slot<V> {
    data: Option<V>,
    error: Option<FetchError>,
    fetched_at: Option<Instant>,
    fetched_at_utc: Option<DateTime<Utc>>,
    settled_at: Option<Instant>,
    /// Set by `invalidate`: fetches issued from this generation on clear it
    invalidated_from: Option<u64>,
    in_flight: Option<(u64, SharedFetch<V>)>,
}

impl<V> Default for Slot<V> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            fetched_at: None,
            fetched_at_utc: None,
            settled_at: None,
            invalidated_from: None,
            in_flight: None,
        }
    }
}

impl<V: Clone> Slot<V> {
    fn state(&self, stale_time: Duration) -> EntryState {
        match self.fetched_at {
            Some(at) if self.invalidated_from.is_none() && at.elapsed() < stale_time => {
                EntryState::Fresh
            }
            Some(_) => EntryState::Stale,
            // Settled without ever producing data
            None if self.settled_at.is_some() && self.in_flight.is_none() => EntryState::Stale,
            None => EntryState::Pending,
        }
    }

    fn fresh_data(&self, stale_time: Duration) -> Option<V> {
        match self.state(stale_time) {
            EntryState::Fresh => self.data.clone(),
            _ => None,
        }
    }

    /// In-flight fetch that was issued after the last invalidation
    fn current_fetch(&self) -> Option<SharedFetch<V>> {
        match (&self.in_flight, self.invalidated_from) {
            (Some((generation, _)), Some(from)) if *generation < from => None,
            (Some((_, shared)), _) => Some(shared.clone()),
            (None, _) => None,
        }
    }

    fn settle(&mut self, generation: u64, result: &Result<V, FetchError>) {
        match result {
            Ok(data) => {
                self.data = Some(data.clone());
                self.error = None;
                self.fetched_at = Some(Instant::now());
                self.fetched_at_utc = Some(Utc::now());
                if self.invalidated_from.is_some_and(|from| generation >= from) {
                    self.invalidated_from = None;
                }
            }
            // Previous data is kept alongside the error
            Err(e) => self.error = Some(e.clone()),
        }
        self.settled_at = Some(Instant::now());
    }

    fn query_state(&self) -> QueryState<V> {
        let is_fetching = self.in_flight.is_some();
        QueryState {
            data: self.data.clone(),
            error: self.error.clone(),
            is_loading: is_fetching && self.data.is_none(),
            is_fetching,
        }
    }
}

/// Cache for one family of queries
pub struct QueryCache<K, V> {
    name: &'static str,
    stale_time: Duration,
    gc_time: Duration,
    slots: Arc<RwLock<HashMap<K, Slot<V>>>>,
    generation: AtomicU64,
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a cache whose entries go stale after `stale_time` and are
    /// evicted once they have been stale for `gc_time`
    pub fn new(name: &'static str, stale_time: Duration, gc_time: Duration) -> Self {
        Self {
            name,
            stale_time,
            gc_time,
            slots: Arc::new(RwLock::new(HashMap::new())),
            generation: AtomicU64::new(0),
        }
    }

    pub fn stale_time(&self) -> Duration {
        self.stale_time
    }

    /// Return cached data for `key` if there is any, or wait for `fetcher`
    /// (joining an identical request already in flight). Stale data is
    /// returned immediately and refreshed in the background.
    pub async fn fetch<F, Fut>(&self, key: K, fetcher: F) -> Result<V, FetchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
    {
        self.load(key, fetcher, false).await
    }

    /// Request `key` again regardless of freshness and wait for the result
    pub async fn refetch<F, Fut>(&self, key: K, fetcher: F) -> Result<V, FetchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
    {
        self.load(key, fetcher, true).await
    }

    /// `fetch`, reported as the consumer-facing state
    pub async fn query<F, Fut>(&self, key: K, fetcher: F) -> QueryState<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
    {
        let result = self.fetch(key.clone(), fetcher).await;
        self.state_after(&key, result).await
    }

    /// `refetch`, reported as the consumer-facing state
    pub async fn refetch_query<F, Fut>(&self, key: K, fetcher: F) -> QueryState<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
    {
        let result = self.refetch(key.clone(), fetcher).await;
        self.state_after(&key, result).await
    }

    /// Current state without triggering a request
    pub async fn snapshot(&self, key: &K) -> QueryState<V> {
        self.slots
            .read()
            .await
            .get(key)
            .map(Slot::query_state)
            .unwrap_or_else(QueryState::idle)
    }

    pub async fn entry(&self, key: &K) -> Option<CacheEntry<K, V>> {
        self.slots.read().await.get(key).map(|slot| CacheEntry {
            key: key.clone(),
            data: slot.data.clone(),
            error: slot.error.clone(),
            fetched_at: slot.fetched_at_utc,
            state: slot.state(self.stale_time),
        })
    }

    /// Mark an entry stale so the next access requests it again. A fetch
    /// already running does not make the entry fresh again.
    pub async fn invalidate(&self, key: &K) -> bool {
        match self.slots.write().await.get_mut(key) {
            Some(slot) => {
                slot.invalidated_from = Some(self.generation.load(Ordering::SeqCst));
                debug!(cache = self.name, ?key, "Invalidated entry");
                true
            }
            None => false,
        }
    }

    pub async fn remove(&self, key: &K) -> bool {
        self.slots.write().await.remove(key).is_some()
    }

    pub async fn clear(&self) {
        self.slots.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop settled entries that have outlived `stale_time + gc_time`.
    /// Returns the number of entries removed.
    pub async fn evict_expired(&self) -> usize {
        let horizon = self.stale_time.saturating_add(self.gc_time);
        let mut slots = self.slots.write().await;
        let before = slots.len();
        slots.retain(|_, slot| {
            slot.in_flight.is_some()
                || slot
                    .settled_at
                    .is_some_and(|settled| settled.elapsed() < horizon)
        });
        let evicted = before - slots.len();
        if evicted > 0 {
            debug!(cache = self.name, evicted, "Evicted expired entries");
        }
        evicted
    }

    async fn load<F, Fut>(&self, key: K, fetcher: F, force: bool) -> Result<V, FetchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
    {
        let pending = {
            let mut slots = self.slots.write().await;
            let slot = slots.entry(key.clone()).or_default();

            if !force {
                if let Some(data) = slot.fresh_data(self.stale_time) {
                    debug!(cache = self.name, ?key, "Cache hit");
                    return Ok(data);
                }
            }

            let stale = if force { None } else { slot.data.clone() };
            if stale.is_some() {
                debug!(cache = self.name, ?key, "Serving stale data, refreshing in background");
            }

            let pending = match slot.current_fetch() {
                Some(shared) => {
                    debug!(cache = self.name, ?key, "Joining in-flight request");
                    shared
                }
                None => {
                    debug!(cache = self.name, ?key, "Cache miss, fetching");
                    let generation = self.generation.fetch_add(1, Ordering::SeqCst);
                    let shared = self.spawn_fetch(key, generation, fetcher());
                    slot.in_flight = Some((generation, shared.clone()));
                    shared
                }
            };

            match stale {
                Some(data) => return Ok(data),
                None => pending,
            }
        };

        pending.await
    }

    fn spawn_fetch<Fut>(&self, key: K, generation: u64, fut: Fut) -> SharedFetch<V>
    where
        Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
    {
        let slots = Arc::clone(&self.slots);
        let name = self.name;

        let handle = tokio::spawn(async move {
            let result = fut.await;
            if let Err(e) = &result {
                warn!(cache = name, ?key, error = %e, "Request failed");
            }

            let mut slots = slots.write().await;
            if let Some(slot) = slots.get_mut(&key) {
                let current = matches!(&slot.in_flight, Some((g, _)) if *g == generation);
                if current {
                    slot.in_flight = None;
                    slot.settle(generation, &result);
                }
            }
            result
        });

        async move {
            handle
                .await
                .unwrap_or_else(|e| Err(FetchError::Aborted(e.to_string())))
        }
        .boxed()
        .shared()
    }

    async fn state_after(&self, key: &K, result: Result<V, FetchError>) -> QueryState<V> {
        let mut state = self.snapshot(key).await;
        match result {
            Ok(data) => {
                state.data = Some(data);
                state.error = None;
            }
            Err(e) => state.error = Some(e),
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting_fetcher(
        counter: &Arc<AtomicUsize>,
        delay: Duration,
    ) -> impl FnOnce() -> BoxFuture<'static, Result<usize, FetchError>> {
        let counter = Arc::clone(counter);
        move || {
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                tokio::time::sleep(delay).await;
                Ok(n)
            }
            .boxed()
        }
    }

    fn failing_fetcher(
        counter: &Arc<AtomicUsize>,
    ) -> impl FnOnce() -> BoxFuture<'static, Result<usize, FetchError>> {
        let counter = Arc::clone(counter);
        move || {
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(FetchError::Network("connection refused".to_string()))
            }
            .boxed()
        }
    }

    fn cache(stale_time: Duration) -> QueryCache<&'static str, usize> {
        QueryCache::new("test", stale_time, Duration::from_secs(300))
    }

    #[tokio::test]
    async fn test_fresh_entry_is_served_from_cache() {
        let cache = cache(Duration::from_secs(60));
        let counter = Arc::new(AtomicUsize::new(0));

        let first = cache.fetch("a", counting_fetcher(&counter, Duration::ZERO)).await;
        let second = cache.fetch("a", counting_fetcher(&counter, Duration::ZERO)).await;

        assert_eq!(first, Ok(1));
        assert_eq!(second, Ok(1));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(cache.entry(&"a").await.unwrap().state, EntryState::Fresh);
    }

    #[tokio::test]
    async fn test_stale_entry_is_refreshed_in_background() {
        let cache = cache(Duration::from_millis(10));
        let counter = Arc::new(AtomicUsize::new(0));

        cache.fetch("a", counting_fetcher(&counter, Duration::ZERO)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.entry(&"a").await.unwrap().state, EntryState::Stale);

        let started = Instant::now();
        let state = cache
            .query("a", counting_fetcher(&counter, Duration::from_millis(300)))
            .await;
        assert!(started.elapsed() < Duration::from_millis(200));
        assert_eq!(state.data, Some(1));
        assert!(state.is_fetching);
        assert!(!state.is_loading);

        // Another access while the refresh runs joins it
        let again = cache.fetch("a", counting_fetcher(&counter, Duration::ZERO)).await;
        assert_eq!(again, Ok(1));

        tokio::time::sleep(Duration::from_millis(400)).await;
        let state = cache.snapshot(&"a").await;
        assert_eq!(state.data, Some(2));
        assert!(!state.is_fetching);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_entry_without_data_waits_for_fetch() {
        let cache = cache(Duration::from_secs(60));
        let counter = Arc::new(AtomicUsize::new(0));

        let state = cache
            .query("a", counting_fetcher(&counter, Duration::from_millis(30)))
            .await;

        assert_eq!(state.data, Some(1));
        assert!(!state.is_fetching);
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_fetch() {
        let cache = cache(Duration::from_secs(60));
        let counter = Arc::new(AtomicUsize::new(0));

        let (a, b) = tokio::join!(
            cache.fetch("a", counting_fetcher(&counter, Duration::from_millis(30))),
            cache.fetch("a", counting_fetcher(&counter, Duration::from_millis(30))),
        );

        assert_eq!(a, Ok(1));
        assert_eq!(b, Ok(1));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_are_independent() {
        let cache = cache(Duration::from_secs(60));
        let counter = Arc::new(AtomicUsize::new(0));

        cache.fetch("a", counting_fetcher(&counter, Duration::ZERO)).await.unwrap();
        cache.fetch("b", counting_fetcher(&counter, Duration::ZERO)).await.unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_failure_is_stored_and_not_retried() {
        let cache = cache(Duration::from_secs(60));
        let counter = Arc::new(AtomicUsize::new(0));

        let state = cache.query("a", failing_fetcher(&counter)).await;
        assert!(matches!(state.error, Some(FetchError::Network(_))));
        assert!(state.data.is_none());
        assert!(!state.is_loading);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(cache.entry(&"a").await.unwrap().state, EntryState::Stale);

        // The next access tries again
        let state = cache.query("a", counting_fetcher(&counter, Duration::ZERO)).await;
        assert_eq!(state.data, Some(2));
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_refetch_ignores_freshness() {
        let cache = cache(Duration::from_secs(60));
        let counter = Arc::new(AtomicUsize::new(0));

        cache.fetch("a", counting_fetcher(&counter, Duration::ZERO)).await.unwrap();
        let again = cache.refetch("a", counting_fetcher(&counter, Duration::ZERO)).await;

        assert_eq!(again, Ok(2));
    }

    #[tokio::test]
    async fn test_invalidate_marks_entry_stale() {
        let cache = cache(Duration::from_secs(60));
        let counter = Arc::new(AtomicUsize::new(0));

        cache.fetch("a", counting_fetcher(&counter, Duration::ZERO)).await.unwrap();
        assert!(cache.invalidate(&"a").await);
        assert!(!cache.invalidate(&"missing").await);
        assert_eq!(cache.entry(&"a").await.unwrap().state, EntryState::Stale);

        let again = cache.fetch("a", counting_fetcher(&counter, Duration::ZERO)).await;
        assert_eq!(again, Ok(1));

        tokio::time::sleep(Duration::from_millis(20)).await;
        let entry = cache.entry(&"a").await.unwrap();
        assert_eq!(entry.data, Some(2));
        assert_eq!(entry.state, EntryState::Fresh);
    }

    #[tokio::test]
    async fn test_invalidate_during_fetch_keeps_entry_stale() {
        let cache = cache(Duration::from_secs(60));
        let counter = Arc::new(AtomicUsize::new(0));

        let (fetched, invalidated) = tokio::join!(
            cache.fetch("a", counting_fetcher(&counter, Duration::from_millis(40))),
            async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                cache.invalidate(&"a").await
            }
        );
        assert_eq!(fetched, Ok(1));
        assert!(invalidated);
        assert_eq!(cache.entry(&"a").await.unwrap().state, EntryState::Stale);

        // The next access issues a new request instead of trusting the old one
        let served = cache.fetch("a", counting_fetcher(&counter, Duration::ZERO)).await;
        assert_eq!(served, Ok(1));
        tokio::time::sleep(Duration::from_millis(20)).await;
        let entry = cache.entry(&"a").await.unwrap();
        assert_eq!(entry.data, Some(2));
        assert_eq!(entry.state, EntryState::Fresh);
    }

    #[tokio::test]
    async fn test_abandoned_request_still_settles() {
        let cache = cache(Duration::from_secs(60));
        let counter = Arc::new(AtomicUsize::new(0));

        let abandoned = tokio::time::timeout(
            Duration::from_millis(5),
            cache.fetch("a", counting_fetcher(&counter, Duration::from_millis(40))),
        )
        .await;
        assert!(abandoned.is_err());
        assert!(cache.snapshot(&"a").await.is_loading);

        tokio::time::sleep(Duration::from_millis(100)).await;

        let state = cache.snapshot(&"a").await;
        assert_eq!(state.data, Some(1));
        assert!(!state.is_fetching);
    }

    #[tokio::test]
    async fn test_snapshot_of_unknown_key_is_idle() {
        let cache = cache(Duration::from_secs(60));
        let state = cache.snapshot(&"nothing").await;
        assert!(state.data.is_none());
        assert!(!state.is_loading);
        assert!(!state.is_fetching);
    }

    #[tokio::test]
    async fn test_evict_expired_drops_old_entries() {
        let cache: QueryCache<&'static str, usize> =
            QueryCache::new("test", Duration::ZERO, Duration::ZERO);
        let counter = Arc::new(AtomicUsize::new(0));

        cache.fetch("a", counting_fetcher(&counter, Duration::ZERO)).await.unwrap();
        assert_eq!(cache.evict_expired().await, 1);
        assert!(cache.is_empty().await);

        let long_lived = self::cache(Duration::from_secs(60));
        long_lived
            .fetch("a", counting_fetcher(&counter, Duration::ZERO))
            .await
            .unwrap();
        assert_eq!(long_lived.evict_expired().await, 0);
        assert!(long_lived.remove(&"a").await);
    }
}
