//! Debounced input with generation tagging
//!
//! Each submitted value supersedes the previous one. The value is released on
//! the channel after a quiet period, tagged with its generation; consumers
//! compare that tag with `latest()` to drop anything stale.

use super::task::TaskHandle;
use std::time::Duration;
use tokio::sync::mpsc;

/// A value whose quiet period elapsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Due<T> {
    pub generation: u64,
    pub value: T,
}

pub struct Debouncer<T> {
    quiet: Duration,
    generation: u64,
    pending: Option<TaskHandle>,
    tx: mpsc::UnboundedSender<Due<T>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(quiet: Duration) -> (Self, mpsc::UnboundedReceiver<Due<T>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            quiet,
            generation: 0,
            pending: None,
            tx,
        };
        (debouncer, rx)
    }

    /// Restart the quiet period with a new value; returns its generation
    pub fn submit(&mut self, value: T) -> u64 {
        self.supersede();
        let generation = self.generation;
        let quiet = self.quiet;
        let tx = self.tx.clone();
        self.pending = Some(TaskHandle::spawn(async move {
            tokio::time::sleep(quiet).await;
            let _ = tx.send(Due { generation, value });
        }));
        generation
    }

    /// Drop the pending value (if any) and invalidate everything issued so far
    pub fn supersede(&mut self) {
        if let Some(mut pending) = self.pending.take() {
            pending.cancel();
        }
        self.generation += 1;
    }

    pub fn latest(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// A value is waiting out its quiet period
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(TaskHandle::is_active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUIET: Duration = Duration::from_millis(600);

    #[tokio::test(start_paused = true)]
    async fn test_only_last_value_released() {
        let (mut debouncer, mut rx) = Debouncer::new(QUIET);
        debouncer.submit("f");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.submit("fo");
        tokio::time::sleep(Duration::from_millis(100)).await;
        let last = debouncer.submit("foo");

        let due = rx.recv().await.unwrap();
        assert_eq!(due, Due { generation: last, value: "foo" });
        assert!(debouncer.is_current(due.generation));

        tokio::time::sleep(QUIET * 2).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_release_waits_for_quiet_period() {
        let (mut debouncer, mut rx) = Debouncer::new(QUIET);
        debouncer.submit(1);
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(599)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(rx.try_recv().unwrap().value, 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_supersede_invalidates_released_values() {
        let (mut debouncer, mut rx) = Debouncer::new(QUIET);
        debouncer.submit(1);
        let due = rx.recv().await.unwrap();

        debouncer.supersede();
        assert!(!debouncer.is_current(due.generation));
        assert!(!debouncer.is_pending());
    }
}
