//! Single-resolution completion slots and the futures that observe them.

use std::{
    future::Future,
    pin::Pin,
    sync::atomic::{AtomicU8, Ordering},
    task::{Context, Poll},
};

use parking_lot::Mutex;
use tokio::sync::oneshot;

const PENDING: u8 = 0;
const RESOLVED: u8 = 1;

/// How a wait ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution<T> {
    /// A dispatched event satisfied the predicate.
    Matched(T),
    /// The wait was cancelled, timed out, or its registry was torn down.
    Cancelled,
}

impl<T> Resolution<T> {
    /// Return the matched value, if any.
    pub fn matched(self) -> Option<T> {
        match self {
            Self::Matched(value) => Some(value),
            Self::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Write side of a one-shot wait.
///
/// The first call to [`CompletionSlot::resolve`] wins; every later call
/// returns `false` and has no effect.
#[derive(Debug)]
pub struct CompletionSlot<T> {
    state: AtomicU8,
    tx: Mutex<Option<oneshot::Sender<Resolution<T>>>>,
}

impl<T> CompletionSlot<T> {
    /// Create a slot together with the handle that observes it.
    pub fn new() -> (Self, WaitHandle<T>) {
        let (tx, rx) = oneshot::channel();
        let slot = Self {
            state: AtomicU8::new(PENDING),
            tx: Mutex::new(Some(tx)),
        };
        (slot, WaitHandle { rx })
    }

    /// Resolve the slot. Returns `true` if this call performed the transition.
    pub fn resolve(&self, resolution: Resolution<T>) -> bool {
        if self
            .state
            .compare_exchange(PENDING, RESOLVED, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        if let Some(tx) = self.tx.lock().take() {
            // The waiter may have given up already; the slot is resolved either way.
            let _ = tx.send(resolution);
        }

        true
    }

    pub fn is_resolved(&self) -> bool {
        self.state.load(Ordering::Acquire) == RESOLVED
    }

    /// Whether the waiting side was dropped before resolution.
    pub fn is_abandoned(&self) -> bool {
        self.tx.lock().as_ref().is_some_and(oneshot::Sender::is_closed)
    }
}

/// Single-use future that yields the [`Resolution`] of a slot.
///
/// A slot dropped without being resolved yields [`Resolution::Cancelled`].
#[derive(Debug)]
pub struct WaitHandle<T> {
    rx: oneshot::Receiver<Resolution<T>>,
}

impl<T> Future for WaitHandle<T> {
    type Output = Resolution<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.unwrap_or(Resolution::Cancelled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_resolution_wins() {
        let (slot, handle) = CompletionSlot::new();

        assert!(slot.resolve(Resolution::Matched(7)));
        assert!(!slot.resolve(Resolution::Cancelled));
        assert!(!slot.resolve(Resolution::Matched(8)));
        assert!(slot.is_resolved());

        assert_eq!(handle.await, Resolution::Matched(7));
    }

    #[tokio::test]
    async fn cancellation_before_match_sticks() {
        let (slot, handle) = CompletionSlot::<u32>::new();

        assert!(slot.resolve(Resolution::Cancelled));
        assert!(!slot.resolve(Resolution::Matched(1)));

        assert!(handle.await.is_cancelled());
    }

    #[tokio::test]
    async fn dropped_slot_reads_as_cancelled() {
        let (slot, handle) = CompletionSlot::<u32>::new();
        drop(slot);

        assert_eq!(handle.await, Resolution::Cancelled);
    }

    #[test]
    fn abandoned_when_handle_dropped() {
        let (slot, handle) = CompletionSlot::<u32>::new();
        assert!(!slot.is_abandoned());

        drop(handle);

        assert!(slot.is_abandoned());
        assert!(slot.resolve(Resolution::Matched(3)));
        assert!(!slot.is_abandoned());
    }
}
