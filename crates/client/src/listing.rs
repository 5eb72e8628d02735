//! Shared per-entity list cache.
//!
//! A [`ListStore`] owns the last good page of one entity type and the set of
//! observers rendering it. Every refresh replaces the cached list wholesale
//! and notifies observers synchronously. Failures leave the cache untouched.
//!
//! Each refresh takes a sequence number when it starts. A response is applied
//! only if no newer refresh was issued meanwhile, so a slow, older request
//! can never overwrite a newer result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use hemmy_core::Resource;

use crate::api::{ApiClient, ApiError};
use crate::decode::{Page, decode_page};
use crate::notify::{Level, Notifier};

/// Immutable view of the cache at one point in time.
#[derive(Debug)]
pub struct ListSnapshot<T> {
    pub items: Arc<Vec<T>>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    /// Sequence number of the refresh that produced this view (0 = never).
    pub seq: u64,
}

impl<T> Clone for ListSnapshot<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            seq: self.seq,
        }
    }
}

impl<T> Default for ListSnapshot<T> {
    fn default() -> Self {
        Self {
            items: Arc::new(Vec::new()),
            total: 0,
            page: 1,
            page_size: 0,
            seq: 0,
        }
    }
}

type Listener<T> = Arc<dyn Fn(&ListSnapshot<T>) + Send + Sync>;
type Listeners<T> = Mutex<Vec<(u64, Listener<T>)>>;

struct ListState<T> {
    snapshot: ListSnapshot<T>,
    latest_issued: u64,
}

pub struct ListStore<T> {
    state: Mutex<ListState<T>>,
    listeners: Arc<Listeners<T>>,
    next_listener: AtomicU64,
    /// Sequence number of the last snapshot handed to observers. Held while
    /// observers run, so deliveries never interleave.
    delivered: Mutex<u64>,
}

impl<T> core::fmt::Debug for ListStore<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.lock_state();
        f.debug_struct("ListStore")
            .field("items", &state.snapshot.items.len())
            .field("total", &state.snapshot.total)
            .field("seq", &state.snapshot.seq)
            .field("latest_issued", &state.latest_issued)
            .finish()
    }
}

impl<T> Default for ListStore<T> {
    fn default() -> Self {
        Self {
            state: Mutex::new(ListState {
                snapshot: ListSnapshot::default(),
                latest_issued: 0,
            }),
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_listener: AtomicU64::new(1),
            delivered: Mutex::new(0),
        }
    }
}

impl<T> ListStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_state(&self) -> MutexGuard<'_, ListState<T>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> ListSnapshot<T> {
        self.lock_state().snapshot.clone()
    }

    pub fn items(&self) -> Arc<Vec<T>> {
        Arc::clone(&self.lock_state().snapshot.items)
    }

    /// Register an observer. It is called after every applied refresh until
    /// the returned [`Subscription`] is dropped or unsubscribed.
    pub fn subscribe<F>(&self, listener: F) -> Subscription<T>
    where
        F: Fn(&ListSnapshot<T>) + Send + Sync + 'static,
    {
        let id = self.next_listener.fetch_add(1, Ordering::Relaxed);
        lock_listeners(&self.listeners).push((id, Arc::new(listener)));
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        lock_listeners(&self.listeners).len()
    }

    /// Reserve the next sequence number for a refresh about to start.
    pub fn begin_refresh(&self) -> u64 {
        let mut state = self.lock_state();
        state.latest_issued += 1;
        state.latest_issued
    }

    /// Install `page` if `seq` is still the latest issued refresh.
    ///
    /// Returns whether the page was applied. Observers are called after the
    /// cache lock is released, in subscription order, and always with the
    /// snapshot current at delivery time. Observers must not call back into
    /// `apply` or `clear` on the same store.
    pub fn apply(&self, seq: u64, page: Page<T>, page_number: usize, page_size: usize) -> bool {
        {
            let mut state = self.lock_state();
            if seq != state.latest_issued {
                tracing::debug!(seq, latest = state.latest_issued, "discarding stale list response");
                return false;
            }
            state.snapshot = ListSnapshot {
                items: Arc::new(page.data),
                total: page.total,
                page: page_number,
                page_size,
                seq,
            };
        }

        self.deliver();
        true
    }

    /// Hand the current snapshot to observers unless they already saw it or
    /// a newer one.
    fn deliver(&self) {
        let mut delivered = self.delivered.lock().unwrap_or_else(|e| e.into_inner());
        let snapshot = self.snapshot();
        if snapshot.seq <= *delivered {
            return;
        }
        *delivered = snapshot.seq;

        let listeners: Vec<Listener<T>> = lock_listeners(&self.listeners)
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener(&snapshot);
        }
    }

    /// Drop cached data and invalidate in-flight refreshes (e.g. on logout).
    pub fn clear(&self) {
        {
            let mut state = self.lock_state();
            state.latest_issued += 1;
            state.snapshot = ListSnapshot {
                seq: state.latest_issued,
                ..ListSnapshot::default()
            };
        }
        self.deliver();
    }
}

impl<T: Resource> ListStore<T> {
    /// Fetch one page and, if still current, replace the cache with it.
    ///
    /// Never fails: on error the user is notified, the cache keeps its last
    /// good data and an empty page is returned. Page number and size are
    /// clamped to at least 1.
    pub async fn refresh(
        &self,
        api: &dyn ApiClient,
        notifier: &dyn Notifier,
        page: usize,
        page_size: usize,
    ) -> Page<T> {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let query = [("page", page.to_string()), ("pageSize", page_size.to_string())];
        self.fetch(api, notifier, &query, page, page_size).await
    }

    /// Fetch the whole, unpaginated collection.
    pub async fn refresh_all(&self, api: &dyn ApiClient, notifier: &dyn Notifier) -> Page<T> {
        self.fetch(api, notifier, &[], 1, 0).await
    }

    async fn fetch(
        &self,
        api: &dyn ApiClient,
        notifier: &dyn Notifier,
        query: &[(&str, String)],
        page: usize,
        page_size: usize,
    ) -> Page<T> {
        let seq = self.begin_refresh();

        let result = api.get_json(T::PATH, query).await.and_then(|value| {
            decode_page::<T>(T::ROUTE_CODE, value).map_err(|e| ApiError::Decode(e.to_string()))
        });

        match result {
            Ok(fetched) => {
                let returned = Page {
                    data: fetched.data.clone(),
                    total: fetched.total,
                };
                self.apply(seq, fetched, page, page_size);
                returned
            }
            Err(err) => {
                tracing::warn!(resource = T::ROUTE_CODE, seq, error = %err, "list refresh failed; keeping cached data");
                notifier.notify(Level::Error, &err.user_message());
                Page::empty()
            }
        }
    }
}

fn lock_listeners<T>(listeners: &Listeners<T>) -> MutexGuard<'_, Vec<(u64, Listener<T>)>> {
    listeners.lock().unwrap_or_else(|e| e.into_inner())
}

/// Handle returned by [`ListStore::subscribe`]; dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription<T> {
    id: u64,
    listeners: Weak<Listeners<T>>,
}

impl<T> Subscription<T> {
    pub fn unsubscribe(self) {
        // Drop does the work.
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            lock_listeners(&listeners).retain(|(id, _)| *id != self.id);
        }
    }
}

impl<T> core::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use async_trait::async_trait;
    use hemmy_core::entities::Plan;
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use tokio::sync::oneshot;

    /// Each call waits for the test to release its response.
    #[derive(Default)]
    struct GatedApi {
        gates: Mutex<VecDeque<oneshot::Receiver<Result<Value, ApiError>>>>,
        queries: Mutex<Vec<Vec<(String, String)>>>,
    }

    impl GatedApi {
        fn gate(&self) -> oneshot::Sender<Result<Value, ApiError>> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().push_back(rx);
            tx
        }
    }

    #[async_trait]
    impl ApiClient for GatedApi {
        async fn get_json(&self, _path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
            self.queries
                .lock()
                .unwrap()
                .push(query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect());
            let gate = self.gates.lock().unwrap().pop_front();
            match gate {
                Some(rx) => rx.await.unwrap_or(Err(ApiError::Network("gate dropped".into()))),
                None => Err(ApiError::Network("no gate".into())),
            }
        }

        async fn post_json(&self, _path: &str, _body: &Value) -> Result<Value, ApiError> {
            Err(ApiError::Network("unused".into()))
        }
    }

    fn plans(ids: &[i64]) -> Value {
        Value::Array(
            ids.iter()
                .map(|id| json!({ "id": id, "name": format!("Plan {id}"), "speed": 10, "price": 30.0 }))
                .collect(),
        )
    }

    fn ids(items: &[Plan]) -> Vec<i64> {
        items.iter().map(|p| p.id.get()).collect()
    }

    #[tokio::test]
    async fn refresh_replaces_cache_and_notifies_observers() {
        let store = ListStore::<Plan>::new();
        let api = GatedApi::default();
        let notifier = RecordingNotifier::new();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_a = Arc::clone(&seen);
        let _a = store.subscribe(move |snap| seen_a.lock().unwrap().push(("a", snap.items.len())));
        let seen_b = Arc::clone(&seen);
        let _b = store.subscribe(move |snap| seen_b.lock().unwrap().push(("b", snap.items.len())));

        api.gate().send(Ok(json!({ "data": plans(&[1, 2, 3]), "total": 12 }))).unwrap();
        let page = store.refresh(&api, &notifier, 2, 3).await;

        assert_eq!(ids(&page.data), vec![1, 2, 3]);
        assert_eq!(page.total, 12);
        let snap = store.snapshot();
        assert_eq!(ids(&snap.items), vec![1, 2, 3]);
        assert_eq!((snap.page, snap.page_size, snap.total), (2, 3, 12));
        assert_eq!(*seen.lock().unwrap(), vec![("a", 3), ("b", 3)]);
        assert_eq!(
            api.queries.lock().unwrap()[0],
            vec![("page".to_string(), "2".to_string()), ("pageSize".to_string(), "3".to_string())]
        );
    }

    #[tokio::test]
    async fn failed_refresh_keeps_stale_data() {
        let store = ListStore::<Plan>::new();
        let api = GatedApi::default();
        let notifier = RecordingNotifier::new();

        api.gate().send(Ok(plans(&[1, 2]))).unwrap();
        store.refresh(&api, &notifier, 1, 10).await;

        let calls = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&calls);
        let _sub = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        api.gate()
            .send(Err(ApiError::Status { status: 500, body: "boom".into() }))
            .unwrap();
        let page = store.refresh(&api, &notifier, 2, 10).await;

        assert!(page.data.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(ids(&store.items()), vec![1, 2]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, Level::Error);
    }

    #[tokio::test]
    async fn undecodable_body_counts_as_failure() {
        let store = ListStore::<Plan>::new();
        let api = GatedApi::default();
        let notifier = RecordingNotifier::new();

        api.gate().send(Ok(plans(&[4]))).unwrap();
        store.refresh_all(&api, &notifier).await;
        api.gate().send(Ok(json!({ "error": "oops" }))).unwrap();
        store.refresh_all(&api, &notifier).await;

        assert_eq!(ids(&store.items()), vec![4]);
        assert!(api.queries.lock().unwrap().iter().all(Vec::is_empty));
    }

    #[tokio::test]
    async fn out_of_order_responses_keep_the_newest() {
        let store = ListStore::<Plan>::new();
        let api = GatedApi::default();
        let notifier = RecordingNotifier::new();

        let first = api.gate();
        let second = api.gate();

        let release = async {
            second.send(Ok(plans(&[20, 21]))).unwrap();
            tokio::task::yield_now().await;
            tokio::task::yield_now().await;
            first.send(Ok(plans(&[10]))).unwrap();
        };

        let (older, newer, ()) = tokio::join!(
            store.refresh(&api, &notifier, 1, 10),
            store.refresh(&api, &notifier, 2, 10),
            release,
        );

        // Both callers get their own response back...
        assert_eq!(ids(&older.data), vec![10]);
        assert_eq!(ids(&newer.data), vec![20, 21]);
        // ...but only the latest-issued refresh lands in the cache.
        assert_eq!(ids(&store.items()), vec![20, 21]);
        assert_eq!(store.snapshot().seq, 2);
    }

    #[tokio::test]
    async fn identical_refreshes_are_idempotent() {
        let store = ListStore::<Plan>::new();
        let api = GatedApi::default();
        let notifier = RecordingNotifier::new();

        api.gate().send(Ok(plans(&[3, 1, 2]))).unwrap();
        store.refresh(&api, &notifier, 1, 10).await;
        let first = store.items();
        api.gate().send(Ok(plans(&[3, 1, 2]))).unwrap();
        store.refresh(&api, &notifier, 1, 10).await;

        assert_eq!(*first, *store.items());
    }

    fn page_of(ids: &[i64]) -> Page<Plan> {
        let data: Vec<Plan> = serde_json::from_value(plans(ids)).unwrap();
        Page { total: data.len(), data }
    }

    #[tokio::test]
    async fn refresh_never_requests_empty_pages() {
        let store = ListStore::<Plan>::new();
        let api = GatedApi::default();
        let notifier = RecordingNotifier::new();

        api.gate().send(Ok(plans(&[1]))).unwrap();
        store.refresh(&api, &notifier, 0, 0).await;

        assert_eq!(
            api.queries.lock().unwrap()[0],
            vec![("page".to_string(), "1".to_string()), ("pageSize".to_string(), "1".to_string())]
        );
        let snap = store.snapshot();
        assert_eq!((snap.page, snap.page_size), (1, 1));
    }

    #[test]
    fn observers_never_end_on_a_superseded_list() {
        use std::sync::mpsc;

        let store = Arc::new(ListStore::<Plan>::new());

        // The first observer stalls on its first call until released.
        let (entered_tx, entered_rx) = mpsc::channel::<()>();
        let (resume_tx, resume_rx) = mpsc::channel::<()>();
        let gate = Mutex::new(Some((entered_tx, resume_rx)));
        let _slow = store.subscribe(move |_| {
            if let Some((entered, resume)) = gate.lock().unwrap().take() {
                entered.send(()).unwrap();
                resume.recv().unwrap();
            }
        });

        let last_seen = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&last_seen);
        let _view = store.subscribe(move |snap| *seen.lock().unwrap() = ids(&snap.items));

        let first = store.begin_refresh();
        let older = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || store.apply(first, page_of(&[1]), 1, 10))
        };
        entered_rx.recv().unwrap();

        let second = store.begin_refresh();
        let newer = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || store.apply(second, page_of(&[2]), 1, 10))
        };
        while store.snapshot().seq != second {
            std::thread::yield_now();
        }
        resume_tx.send(()).unwrap();

        assert!(older.join().unwrap());
        assert!(newer.join().unwrap());
        assert_eq!(ids(&store.items()), vec![2]);
        assert_eq!(*last_seen.lock().unwrap(), vec![2]);
    }

    #[test]
    fn clear_reaches_observers_once() {
        let store = ListStore::<Plan>::new();
        let calls = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&calls);
        let _sub = store.subscribe(move |snap| {
            assert!(snap.items.is_empty());
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.clear();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let store = ListStore::<Plan>::new();
        let sub = store.subscribe(|_| {});
        let kept = store.subscribe(|_| {});
        assert_eq!(store.subscriber_count(), 2);
        sub.unsubscribe();
        assert_eq!(store.subscriber_count(), 1);
        drop(kept);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn clear_invalidates_in_flight_refreshes() {
        let store = ListStore::<Plan>::new();
        let seq = store.begin_refresh();
        store.clear();
        let page = Page { data: Vec::new(), total: 0 };
        assert!(!store.apply(seq, page, 1, 10));
    }
}
