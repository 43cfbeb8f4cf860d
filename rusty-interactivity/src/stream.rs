//! Persistent waits: every accepted event is forwarded to one consumer.

use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Registry side of an [`EventStream`].
#[derive(Debug)]
pub(crate) struct Forwarder<T> {
    tx: Mutex<Option<mpsc::UnboundedSender<T>>>,
}

impl<T> Forwarder<T> {
    pub(crate) fn new() -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let forwarder = Self {
            tx: Mutex::new(Some(tx)),
        };
        (forwarder, rx)
    }

    /// Open and still read by someone.
    pub(crate) fn is_active(&self) -> bool {
        self.tx.lock().as_ref().is_some_and(|tx| !tx.is_closed())
    }

    /// Hand an event to the consumer. Returns `false` once the stream ended.
    pub(crate) fn send(&self, item: T) -> bool {
        match self.tx.lock().as_ref() {
            Some(tx) => tx.send(item).is_ok(),
            None => false,
        }
    }

    /// End the stream. Events already forwarded stay readable.
    pub(crate) fn finish(&self) -> bool {
        self.tx.lock().take().is_some()
    }
}

/// Consumer side of a persistent wait created by
/// [`Registry::subscribe`](crate::Registry::subscribe).
///
/// The registration stays live until the token fires, the registry is
/// cleared, or the stream is dropped. Dropping it unregisters right away.
pub struct EventStream<T> {
    rx: mpsc::UnboundedReceiver<T>,
    detach: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl<T> EventStream<T> {
    pub(crate) fn new(
        rx: mpsc::UnboundedReceiver<T>,
        detach: Box<dyn FnOnce() + Send + Sync>,
    ) -> Self {
        Self {
            rx,
            detach: Some(detach),
        }
    }

    /// Next accepted event in arrival order, or `None` once the stream ended
    /// and every forwarded event has been read.
    pub async fn next(&mut self) -> Option<T> {
        self.rx.recv().await
    }
}

impl<T> Drop for EventStream<T> {
    fn drop(&mut self) {
        self.rx.close();
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl<T> std::fmt::Debug for EventStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream").finish_non_exhaustive()
    }
}
