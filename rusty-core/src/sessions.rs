//! Background interactive sessions owned by the bot.

use std::{future::Future, sync::Arc, time::Duration};

use parking_lot::Mutex;
use tokio::task::JoinSet;

/// Tracks spawned session tasks so shutdown can wait for their cleanup.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone, Debug, Default)]
pub struct SessionTasks {
    tasks: Arc<Mutex<JoinSet<()>>>,
}

impl SessionTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a session task. Finished tasks are reaped on the way.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.tasks.lock();
        while tasks.try_join_next().is_some() {}
        tasks.spawn(task);
    }

    /// Number of tracked tasks, finished ones not yet reaped included.
    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wait up to `grace` for every tracked task to finish.
    ///
    /// Returns how many were still running and got aborted.
    pub async fn drain(&self, grace: Duration) -> usize {
        let mut tasks = std::mem::take(&mut *self.tasks.lock());

        let finished = tokio::time::timeout(grace, async {
            while tasks.join_next().await.is_some() {}
        })
        .await;

        match finished {
            Ok(()) => 0,
            Err(_) => {
                let unfinished = tasks.len();
                tasks.shutdown().await;
                unfinished
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn drain_waits_for_slow_cleanup() {
        let sessions = SessionTasks::new();
        let cleaned = Arc::new(AtomicUsize::new(0));

        for delay in [1_u64, 5, 20] {
            let cleaned = Arc::clone(&cleaned);
            sessions.spawn(async move {
                tokio::time::sleep(Duration::from_secs(delay)).await;
                cleaned.fetch_add(1, Ordering::SeqCst);
            });
        }

        assert_eq!(sessions.drain(Duration::from_secs(60)).await, 0);
        assert_eq!(cleaned.load(Ordering::SeqCst), 3);
        assert!(sessions.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn drain_gives_up_after_grace() {
        let sessions = SessionTasks::new();
        sessions.spawn(async {});
        sessions.spawn(std::future::pending());

        assert_eq!(sessions.drain(Duration::from_secs(1)).await, 1);
    }
}
