//! Cancellable background tasks
//!
//! Every timer the resolver owns (debounce, installation poll, in-flight
//! lookups) lives behind a `TaskHandle`. Dropping the handle aborts the task,
//! so nothing outlives its owner.

use std::future::Future;
use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct TaskHandle {
    handle: JoinHandle<()>,
    cancelled: bool,
}

impl TaskHandle {
    /// Spawn `future` on the current tokio runtime
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future),
            cancelled: false,
        }
    }

    /// Abort the task. Idempotent.
    pub fn cancel(&mut self) {
        if !self.cancelled {
            self.handle.abort();
            self.cancelled = true;
        }
    }

    /// True until the task completes or is cancelled
    pub fn is_active(&self) -> bool {
        !self.cancelled && !self.handle.is_finished()
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
