//! Cancellation tokens used to end pending waits.
//!
//! A token fires at most once. Requests subscribe to it when they are
//! registered; a deadline is just a token fired by a tokio timer.

use std::{sync::Arc, time::Duration};

use tokio::sync::watch;

/// Cloneable cancellation handle shared by every wait it governs.
#[derive(Clone, Debug)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
    never: bool,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    /// Create a token that fires only when [`CancelToken::cancel`] is called.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            never: false,
        }
    }

    /// Create a token that never fires, for waits that only end by a match,
    /// an explicit stop or a registry clear.
    ///
    /// [`CancelToken::cancel`] is a no-op on it and no watcher task is
    /// spawned for the waits it governs.
    pub fn never() -> Self {
        Self {
            never: true,
            ..Self::new()
        }
    }

    pub fn is_never(&self) -> bool {
        self.never
    }

    /// Create a token that fires after `timeout`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn with_timeout(timeout: Duration) -> Self {
        let token = Self::new();
        let timer = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            timer.cancel();
        });
        token
    }

    /// Fire the token. Firing an already fired token is a no-op.
    pub fn cancel(&self) {
        if self.never {
            return;
        }
        self.tx.send_if_modified(|fired| {
            if *fired {
                false
            } else {
                *fired = true;
                true
            }
        });
    }

    /// Whether the token has fired.
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait until the token fires.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so `wait_for` cannot observe a closed channel.
        let _ = rx.wait_for(|fired| *fired).await;
    }

    /// Subscribe to the token without keeping it alive.
    ///
    /// Once every clone of the token is dropped without firing, the
    /// subscription reports the token as abandoned.
    pub fn subscribe(&self) -> CancelSubscription {
        CancelSubscription {
            rx: self.tx.subscribe(),
        }
    }
}

/// Receiving side of a [`CancelToken`].
#[derive(Debug)]
pub struct CancelSubscription {
    rx: watch::Receiver<bool>,
}

impl CancelSubscription {
    /// Resolve with `true` when the token fires, `false` when it is abandoned.
    pub async fn fired(mut self) -> bool {
        self.rx.wait_for(|fired| *fired).await.is_ok()
    }
}
