//! Accumulating waits: every matching event is kept until the collector ends.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use parking_lot::Mutex;

use crate::completion::{CompletionSlot, Resolution, WaitHandle};

/// Shared state between the registry entry and its [`CollectHandle`].
#[derive(Debug)]
pub(crate) struct Collector<T> {
    active: AtomicBool,
    items: Mutex<Vec<T>>,
    done: CompletionSlot<Vec<T>>,
}

impl<T: Clone> Collector<T> {
    pub(crate) fn new() -> (Arc<Self>, CollectHandle<T>) {
        let (done, wait) = CompletionSlot::new();
        let collector = Arc::new(Self {
            active: AtomicBool::new(true),
            items: Mutex::new(Vec::new()),
            done,
        });
        let handle = CollectHandle {
            collector: Arc::clone(&collector),
            wait,
        };
        (collector, handle)
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Append an event. Returns `false` once the collector has finished.
    pub(crate) fn push(&self, item: T) -> bool {
        let mut items = self.items.lock();
        // Checked under the items lock so nothing lands after `finish` drained it.
        if !self.is_active() {
            return false;
        }
        items.push(item);
        true
    }

    /// Stop accepting events and publish the accumulated set.
    pub(crate) fn finish(&self) -> bool {
        let items = {
            let mut items = self.items.lock();
            if self
                .active
                .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                return false;
            }
            items.clone()
        };
        self.done.resolve(Resolution::Matched(items))
    }

    fn snapshot(&self) -> Vec<T> {
        self.items.lock().clone()
    }
}

/// Caller side of a collect request.
#[derive(Debug)]
pub struct CollectHandle<T> {
    collector: Arc<Collector<T>>,
    wait: WaitHandle<Vec<T>>,
}

impl<T: Clone> CollectHandle<T> {
    /// Events collected so far, in arrival order.
    pub fn snapshot(&self) -> Vec<T> {
        self.collector.snapshot()
    }

    pub fn is_active(&self) -> bool {
        self.collector.is_active()
    }

    /// Explicitly stop collecting. The registry drops the entry on its next visit.
    pub fn stop(&self) {
        self.collector.finish();
    }

    /// Wait for the collector to end and return everything it gathered.
    pub async fn wait(self) -> Vec<T> {
        let Self { collector, wait } = self;
        match wait.await {
            Resolution::Matched(items) => items,
            // Torn down without finishing: hand back whatever arrived.
            Resolution::Cancelled => collector.snapshot(),
        }
    }
}
