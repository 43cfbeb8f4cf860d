//! Pending request registry and event dispatcher.
//!
//! Requests are grouped by a resource key (the message they concern). Each
//! key owns its own lock, so dispatches for different messages never contend,
//! while register, dispatch and removal for one message are serialized.
//!
//! Lock order is always map, then bucket.

use std::{
    collections::HashMap,
    fmt,
    hash::Hash,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::{
    cancel::CancelToken,
    collector::{CollectHandle, Collector},
    completion::{CompletionSlot, Resolution, WaitHandle},
    stream::{EventStream, Forwarder},
};

type Predicate<E> = Box<dyn Fn(&E) -> bool + Send + Sync>;

enum Waiter<E> {
    Match(Arc<CompletionSlot<E>>),
    Collect(Arc<Collector<E>>),
    Stream(Arc<Forwarder<E>>),
}

impl<E: Clone> Waiter<E> {
    /// Settle the waiter after its token fired or the registry was cleared.
    fn cancel(&self) {
        match self {
            Self::Match(slot) => {
                slot.resolve(Resolution::Cancelled);
            }
            Self::Collect(collector) => {
                collector.finish();
            }
            Self::Stream(forwarder) => {
                forwarder.finish();
            }
        }
    }

    fn share(&self) -> Self {
        match self {
            Self::Match(slot) => Self::Match(Arc::clone(slot)),
            Self::Collect(collector) => Self::Collect(Arc::clone(collector)),
            Self::Stream(forwarder) => Self::Stream(Arc::clone(forwarder)),
        }
    }
}

struct Entry<E> {
    id: u64,
    predicate: Predicate<E>,
    waiter: Waiter<E>,
    watcher: Option<JoinHandle<()>>,
}

impl<E: Clone> Entry<E> {
    fn is_live(&self) -> bool {
        match &self.waiter {
            Waiter::Match(slot) => !slot.is_resolved() && !slot.is_abandoned(),
            Waiter::Collect(collector) => collector.is_active(),
            Waiter::Stream(forwarder) => forwarder.is_active(),
        }
    }

    /// Resolve the waiter as cancelled and stop its watcher.
    fn close(self) {
        self.waiter.cancel();
        self.retire();
    }

    fn retire(self) {
        if let Some(watcher) = self.watcher {
            watcher.abort();
        }
    }
}

/// Offer `event` to one entry. Returns whether the entry stays registered.
fn offer<E: Clone>(entry: &Entry<E>, event: &E, outcome: &mut DispatchOutcome) -> bool {
    if !entry.is_live() {
        return false;
    }

    match &entry.waiter {
        // One resolution per event; later match requests are not consulted.
        Waiter::Match(_) | Waiter::Stream(_) if outcome.matched => true,
        Waiter::Match(slot) => {
            if !(entry.predicate)(event) {
                return true;
            }
            // Losing the race against cancellation leaves the event for the next candidate.
            if slot.resolve(Resolution::Matched(event.clone())) {
                outcome.matched = true;
            }
            false
        }
        Waiter::Stream(forwarder) => {
            if !(entry.predicate)(event) {
                return true;
            }
            if forwarder.send(event.clone()) {
                outcome.matched = true;
                true
            } else {
                false
            }
        }
        Waiter::Collect(collector) => {
            if !(entry.predicate)(event) {
                return true;
            }
            if collector.push(event.clone()) {
                outcome.collected += 1;
                true
            } else {
                false
            }
        }
    }
}

type Bucket<E> = Arc<Mutex<Vec<Entry<E>>>>;

struct Inner<K, E> {
    buckets: Mutex<HashMap<K, Bucket<E>>>,
    next_id: AtomicU64,
}

/// Result of offering one event to the registry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// A pending match request or stream took the event.
    pub matched: bool,
    /// Number of collectors that accepted the event.
    pub collected: usize,
}

impl DispatchOutcome {
    /// Whether any waiter consumed the event.
    pub fn is_handled(&self) -> bool {
        self.matched || self.collected > 0
    }
}

/// Registry of pending requests keyed by resource.
///
/// Cheap to clone because it only stores reference-counted shared state.
pub struct Registry<K, E> {
    inner: Arc<Inner<K, E>>,
}

impl<K, E> Clone for Registry<K, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, E> Default for Registry<K, E>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, E> fmt::Debug for Registry<K, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("keys", &self.inner.buckets.lock().len())
            .finish()
    }
}

impl<K, E> Registry<K, E>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                buckets: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Wait for the first event on `key` accepted by `predicate`.
    ///
    /// The returned handle resolves with the event, or with
    /// [`Resolution::Cancelled`] once `token` fires.
    ///
    /// Predicates run while the key's lock is held and must not call back
    /// into this registry; locks are not reentrant and the call deadlocks.
    pub fn register<P>(&self, key: K, predicate: P, token: CancelToken) -> WaitHandle<E>
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        let (slot, handle) = CompletionSlot::new();
        let slot = Arc::new(slot);
        self.insert(key, Box::new(predicate), Waiter::Match(slot), token);
        handle
    }

    /// Collect every event on `key` accepted by `predicate` until `token`
    /// fires or the handle is stopped.
    ///
    /// The predicate must not call back into this registry, as for
    /// [`Registry::register`].
    pub fn collect<P>(&self, key: K, predicate: P, token: CancelToken) -> CollectHandle<E>
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        let (collector, handle) = Collector::new();
        self.insert(key, Box::new(predicate), Waiter::Collect(collector), token);
        handle
    }

    /// Take every event on `key` accepted by `predicate` through one
    /// long-lived registration, until `token` fires or the stream is dropped.
    ///
    /// Each accepted event counts as a match and is not offered to later
    /// match requests. The predicate must not call back into this registry,
    /// as for [`Registry::register`].
    pub fn subscribe<P>(&self, key: K, predicate: P, token: CancelToken) -> EventStream<E>
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        let (forwarder, rx) = Forwarder::new();
        let id = self.insert(
            key.clone(),
            Box::new(predicate),
            Waiter::Stream(Arc::new(forwarder)),
            token,
        );

        let weak = Arc::downgrade(&self.inner);
        EventStream::new(
            rx,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    Self { inner }.remove(&key, id);
                }
            }),
        )
    }

    /// Offer an event to the requests registered on `key`.
    ///
    /// Predicates run in registration order. The first pending match request
    /// (or stream) that accepts the event takes it; a match request is then
    /// removed while a stream stays registered. The remaining match requests
    /// are untouched. Every active collector that accepts the event
    /// keeps a copy. A panicking predicate propagates to the caller.
    pub fn dispatch(&self, key: &K, event: &E) -> DispatchOutcome {
        let Some(bucket) = self.inner.buckets.lock().get(key).cloned() else {
            return DispatchOutcome::default();
        };

        let mut outcome = DispatchOutcome::default();
        let mut retired = Vec::new();
        let now_empty = {
            let mut entries = bucket.lock();
            let mut index = 0;
            while index < entries.len() {
                let keep = offer(&entries[index], event, &mut outcome);
                if keep {
                    index += 1;
                } else {
                    retired.push(entries.remove(index));
                }
            }
            entries.is_empty()
        };

        for entry in retired {
            entry.retire();
        }

        if now_empty {
            self.prune(key, &bucket);
        }

        trace!(
            matched = outcome.matched,
            collected = outcome.collected,
            "dispatched event"
        );
        outcome
    }

    /// Number of live requests registered on `key`.
    pub fn pending(&self, key: &K) -> usize {
        let Some(bucket) = self.inner.buckets.lock().get(key).cloned() else {
            return 0;
        };
        bucket.lock().iter().filter(|entry| entry.is_live()).count()
    }

    /// Number of keys that currently hold at least one entry.
    pub fn key_count(&self) -> usize {
        self.inner.buckets.lock().len()
    }

    /// Tear down every request: waits resolve as cancelled and collectors
    /// finalize what they gathered.
    pub fn clear(&self) {
        let buckets: Vec<Bucket<E>> = self
            .inner
            .buckets
            .lock()
            .drain()
            .map(|(_, bucket)| bucket)
            .collect();
        for bucket in buckets {
            let entries: Vec<Entry<E>> = bucket.lock().drain(..).collect();
            for entry in entries {
                entry.close();
            }
        }
    }

    fn insert(
        &self,
        key: K,
        predicate: Predicate<E>,
        waiter: Waiter<E>,
        token: CancelToken,
    ) -> u64 {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);

        if token.is_cancelled() {
            Entry {
                id,
                predicate,
                waiter,
                watcher: None,
            }
            .close();
            return id;
        }

        let watcher = (!token.is_never())
            .then(|| self.spawn_watcher(key.clone(), id, waiter.share(), token.clone()));

        {
            let mut buckets = self.inner.buckets.lock();
            let bucket = buckets.entry(key.clone()).or_default();
            bucket.lock().push(Entry {
                id,
                predicate,
                waiter,
                watcher,
            });
        }

        // The watcher may have fired before the entry was visible.
        if token.is_cancelled() {
            self.remove(&key, id);
        }

        id
    }

    fn spawn_watcher(
        &self,
        key: K,
        id: u64,
        waiter: Waiter<E>,
        token: CancelToken,
    ) -> JoinHandle<()> {
        let subscription = token.subscribe();
        drop(token);

        let weak = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            if !subscription.fired().await {
                return;
            }

            // Resolve first so the waiter is settled even if the entry is not yet visible.
            waiter.cancel();

            if let Some(inner) = weak.upgrade() {
                Self { inner }.remove(&key, id);
            }
        })
    }

    fn remove(&self, key: &K, id: u64) {
        let Some(bucket) = self.inner.buckets.lock().get(key).cloned() else {
            return;
        };

        let (removed, now_empty) = {
            let mut entries = bucket.lock();
            let removed = entries
                .iter()
                .position(|entry| entry.id == id)
                .map(|index| entries.remove(index));
            (removed, entries.is_empty())
        };

        if let Some(entry) = removed {
            entry.close();
        }

        if now_empty {
            self.prune(key, &bucket);
        }
    }

    fn prune(&self, key: &K, bucket: &Bucket<E>) {
        let mut buckets = self.inner.buckets.lock();
        let still_current = buckets
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, bucket));
        if still_current && bucket.lock().is_empty() {
            buckets.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq)]
    struct Press {
        user: u64,
        label: &'static str,
    }

    fn press(user: u64, label: &'static str) -> Press {
        Press { user, label }
    }

    #[tokio::test]
    async fn first_matching_request_resolves_alone() {
        let registry: Registry<u64, Press> = Registry::new();
        let token = CancelToken::new();

        let first = registry.register(1, |p: &Press| p.user == 10, token.clone());
        let second = registry.register(1, |p: &Press| p.user == 20, token.clone());
        let third = registry.register(1, |p: &Press| p.user == 20, token.clone());
        let fourth = registry.register(1, |p: &Press| p.label == "next", token.clone());

        let outcome = registry.dispatch(&1, &press(20, "next"));
        assert!(outcome.matched);
        assert_eq!(outcome.collected, 0);
        assert_eq!(registry.pending(&1), 3);

        assert_eq!(second.await, Resolution::Matched(press(20, "next")));

        token.cancel();
        assert!(first.await.is_cancelled());
        assert!(third.await.is_cancelled());
        assert!(fourth.await.is_cancelled());
    }

    #[tokio::test]
    async fn unmatched_event_has_no_side_effect() {
        let registry: Registry<u64, Press> = Registry::new();
        let _wait = registry.register(1, |p: &Press| p.user == 10, CancelToken::new());

        let outcome = registry.dispatch(&1, &press(11, "prev"));
        assert!(!outcome.is_handled());
        assert_eq!(registry.pending(&1), 1);

        let other_key = registry.dispatch(&2, &press(10, "prev"));
        assert!(!other_key.is_handled());
        assert_eq!(registry.pending(&1), 1);
    }

    #[tokio::test]
    async fn cancelled_request_ignores_later_match() {
        let registry: Registry<u64, Press> = Registry::new();
        let token = CancelToken::new();
        let wait = registry.register(5, |_: &Press| true, token.clone());

        token.cancel();
        assert_eq!(wait.await, Resolution::Cancelled);

        let outcome = registry.dispatch(&5, &press(1, "stop"));
        assert!(!outcome.matched);
        assert_eq!(registry.pending(&5), 0);
    }

    #[tokio::test]
    async fn pre_cancelled_token_resolves_immediately() {
        let registry: Registry<u64, Press> = Registry::new();
        let token = CancelToken::new();
        token.cancel();

        let wait = registry.register(5, |_: &Press| true, token);

        assert_eq!(registry.key_count(), 0);
        assert!(wait.await.is_cancelled());
    }

    #[tokio::test]
    async fn matched_request_is_removed_and_key_pruned() {
        let registry: Registry<u64, Press> = Registry::new();
        let wait = registry.register(3, |_: &Press| true, CancelToken::new());
        assert_eq!(registry.key_count(), 1);

        assert!(registry.dispatch(&3, &press(1, "next")).matched);
        assert_eq!(registry.key_count(), 0);
        assert!(!registry.dispatch(&3, &press(1, "next")).matched);

        assert_eq!(wait.await.matched(), Some(press(1, "next")));
    }

    #[tokio::test]
    async fn dropped_waiter_does_not_consume_events() {
        let registry: Registry<u64, Press> = Registry::new();
        let abandoned = registry.register(1, |_: &Press| true, CancelToken::new());
        let live = registry.register(1, |_: &Press| true, CancelToken::new());
        drop(abandoned);

        assert!(registry.dispatch(&1, &press(2, "next")).matched);
        assert_eq!(live.await.matched(), Some(press(2, "next")));
    }

    #[tokio::test]
    async fn collector_keeps_matching_events_in_order() {
        let registry: Registry<u64, Press> = Registry::new();
        let token = CancelToken::new();
        let handle = registry.collect(9, |p: &Press| p.user == 1, token.clone());

        registry.dispatch(&9, &press(1, "a"));
        registry.dispatch(&9, &press(2, "x"));
        registry.dispatch(&9, &press(1, "b"));
        registry.dispatch(&9, &press(1, "c"));
        let outcome = registry.dispatch(&9, &press(3, "y"));
        assert_eq!(outcome.collected, 0);

        let expected = vec![press(1, "a"), press(1, "b"), press(1, "c")];
        assert_eq!(handle.snapshot(), expected);
        assert_eq!(registry.pending(&9), 1);

        token.cancel();
        assert_eq!(handle.wait().await, expected);
    }

    #[tokio::test]
    async fn collector_does_not_consume_match_requests() {
        let registry: Registry<u64, Press> = Registry::new();
        let token = CancelToken::new();
        let collected = registry.collect(4, |_: &Press| true, token.clone());
        let wait = registry.register(4, |_: &Press| true, token.clone());

        let outcome = registry.dispatch(&4, &press(1, "next"));
        assert!(outcome.matched);
        assert_eq!(outcome.collected, 1);
        assert_eq!(wait.await.matched(), Some(press(1, "next")));

        collected.stop();
        assert_eq!(registry.dispatch(&4, &press(1, "prev")).collected, 0);
        assert_eq!(registry.key_count(), 0);
        assert_eq!(collected.wait().await, vec![press(1, "next")]);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_cancels_pending_request() {
        let registry: Registry<u64, Press> = Registry::new();
        let wait = registry.register(
            1,
            |_: &Press| true,
            CancelToken::with_timeout(Duration::from_secs(5)),
        );

        assert!(wait.await.is_cancelled());
        tokio::task::yield_now().await;
        assert_eq!(registry.pending(&1), 0);
    }

    #[tokio::test]
    async fn clear_cancels_everything() {
        let registry: Registry<u64, Press> = Registry::new();
        let wait = registry.register(1, |_: &Press| true, CancelToken::new());
        let collected = registry.collect(2, |_: &Press| true, CancelToken::new());
        registry.dispatch(&2, &press(1, "a"));

        registry.clear();

        assert_eq!(registry.key_count(), 0);
        assert!(wait.await.is_cancelled());
        assert_eq!(collected.wait().await, vec![press(1, "a")]);
    }

    #[tokio::test]
    async fn panicking_predicate_propagates_and_registry_survives() {
        let registry: Registry<u64, Press> = Registry::new();
        let _faulty = registry.register(
            1,
            |p: &Press| {
                assert!(p.user != 13, "predicate bug");
                false
            },
            CancelToken::new(),
        );

        let dispatcher = registry.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            dispatcher.dispatch(&1, &press(13, "next"))
        }));
        assert!(result.is_err());

        assert_eq!(registry.pending(&1), 1);
        assert!(!registry.dispatch(&1, &press(14, "next")).is_handled());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_dispatch_resolves_each_request_once() {
        let registry: Registry<u64, u64> = Registry::new();
        let token = CancelToken::new();
        let waits: Vec<_> = (0..32)
            .map(|_| registry.register(1, |_: &u64| true, token.clone()))
            .collect();

        let mut tasks = Vec::new();
        for event in 0..64_u64 {
            let registry = registry.clone();
            tasks.push(tokio::spawn(async move { registry.dispatch(&1, &event) }));
        }

        let mut matched = 0;
        for task in tasks {
            if task.await.unwrap().matched {
                matched += 1;
            }
        }
        assert_eq!(matched, 32);

        let mut seen = Vec::new();
        for wait in waits {
            seen.push(wait.await.matched().unwrap());
        }
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 32);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn cancel_racing_dispatch_settles_each_request_once() {
        let registry: Registry<u64, u64> = Registry::new();
        let mut waits = Vec::new();
        let mut tasks = Vec::new();

        for key in 0..64_u64 {
            let token = CancelToken::new();
            waits.push(registry.register(key, |_: &u64| true, token.clone()));

            let dispatcher = registry.clone();
            tasks.push(tokio::spawn(async move { dispatcher.dispatch(&key, &key).matched }));
            tasks.push(tokio::spawn(async move {
                token.cancel();
                false
            }));
        }

        let mut dispatched = 0;
        for task in tasks {
            if task.await.unwrap() {
                dispatched += 1;
            }
        }

        let mut resolved = 0;
        for (key, wait) in (0..64_u64).zip(waits) {
            if let Resolution::Matched(event) = wait.await {
                assert_eq!(event, key);
                resolved += 1;
            }
        }
        assert_eq!(dispatched, resolved);

        for key in 0..64_u64 {
            assert!(!registry.dispatch(&key, &key).matched);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn cancel_during_registration_leaves_no_entry() {
        let registry: Registry<u64, u64> = Registry::new();

        for key in 0..128_u64 {
            let token = CancelToken::new();
            let canceller = token.clone();
            let cancel = tokio::spawn(async move { canceller.cancel() });
            let wait = registry.register(key, |_: &u64| true, token);
            cancel.await.unwrap();
            assert!(wait.await.is_cancelled());
        }

        let drained = tokio::time::timeout(Duration::from_secs(5), async {
            while registry.key_count() > 0 {
                tokio::task::yield_now().await;
            }
        })
        .await;
        assert!(drained.is_ok(), "{} keys left behind", registry.key_count());
    }

    #[tokio::test]
    async fn stream_takes_every_accepted_event_and_stays_registered() {
        let registry: Registry<u64, Press> = Registry::new();
        let mut stream = registry.subscribe(1, |p: &Press| p.user == 7, CancelToken::never());
        let later = registry.register(1, |_: &Press| true, CancelToken::never());

        assert!(registry.dispatch(&1, &press(7, "next")).matched);
        assert!(registry.dispatch(&1, &press(7, "last")).matched);
        assert_eq!(registry.pending(&1), 2);

        assert_eq!(stream.next().await, Some(press(7, "next")));
        assert_eq!(stream.next().await, Some(press(7, "last")));

        // Rejected by the stream, so the plain match request gets it.
        assert!(registry.dispatch(&1, &press(8, "next")).matched);
        assert_eq!(later.await.matched(), Some(press(8, "next")));
    }

    #[tokio::test]
    async fn stream_ends_on_cancel_and_unregisters_on_drop() {
        let registry: Registry<u64, Press> = Registry::new();
        let token = CancelToken::new();
        let mut cancelled = registry.subscribe(1, |_: &Press| true, token.clone());
        registry.dispatch(&1, &press(1, "a"));

        token.cancel();
        assert_eq!(cancelled.next().await, Some(press(1, "a")));
        assert_eq!(cancelled.next().await, None);
        assert!(!registry.dispatch(&1, &press(1, "b")).matched);

        let dropped = registry.subscribe(2, |_: &Press| true, CancelToken::never());
        assert_eq!(registry.pending(&2), 1);
        drop(dropped);
        assert_eq!(registry.pending(&2), 0);
        assert_eq!(registry.key_count(), 0);
    }

    #[test]
    fn never_token_spawns_no_watcher() {
        // No runtime here: spawning a watcher would panic.
        let registry: Registry<u64, Press> = Registry::new();
        let _wait = registry.register(1, |_: &Press| true, CancelToken::never());
        let _stream = registry.subscribe(1, |_: &Press| true, CancelToken::never());

        assert_eq!(registry.pending(&1), 2);
    }
}
