//! Installation watcher
//!
//! The GitHub App is installed in a separate browser window and nothing calls
//! back when that finishes. The watcher re-reads the platform's link flag on a
//! fixed interval and emits a single `LinkSignal::Linked` once it flips.

use super::task::TaskHandle;
use crate::platform::api::ConnectedAccountApi;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Snapshot of the poll loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallationPollState {
    /// A poll timer is live
    pub active: bool,
    /// Ticks performed since the watcher was created
    pub attempt: u32,
    /// Link flag seen on the most recent successful tick
    pub last_observed_flag: bool,
    session: u64,
}

/// Emitted by the watcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSignal {
    /// The installation completed; observed on tick `attempt`
    Linked { attempt: u32 },
}

pub struct InstallationWatcher {
    accounts: Arc<dyn ConnectedAccountApi>,
    account_id: String,
    state: Arc<Mutex<InstallationPollState>>,
    task: Option<TaskHandle>,
    signals: mpsc::UnboundedSender<LinkSignal>,
}

impl InstallationWatcher {
    pub fn new(
        accounts: Arc<dyn ConnectedAccountApi>,
        account_id: impl Into<String>,
        signals: mpsc::UnboundedSender<LinkSignal>,
    ) -> Self {
        Self {
            accounts,
            account_id: account_id.into(),
            state: Arc::new(Mutex::new(InstallationPollState::default())),
            task: None,
            signals,
        }
    }

    pub fn state(&self) -> InstallationPollState {
        *self.state.lock()
    }

    pub fn is_active(&self) -> bool {
        self.state.lock().active
    }

    /// Start polling every `interval`. Returns false, and does nothing, when a
    /// poll is already live.
    pub fn poll(&mut self, interval: Duration) -> bool {
        let session = {
            let mut state = self.state.lock();
            if state.active {
                log::debug!("Installation poll already active, ignoring");
                return false;
            }
            state.active = true;
            state.session += 1;
            state.session
        };

        log::debug!(
            "Polling link status of '{}' every {}ms",
            self.account_id,
            interval.as_millis()
        );

        let accounts = self.accounts.clone();
        let account_id = self.account_id.clone();
        let state = self.state.clone();
        let signals = self.signals.clone();

        self.task = Some(TaskHandle::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;

                let attempt = {
                    let mut s = state.lock();
                    if !s.active || s.session != session {
                        return;
                    }
                    s.attempt += 1;
                    s.attempt
                };

                match accounts.get_linked_account_status(&account_id).await {
                    Ok(status) => {
                        let mut s = state.lock();
                        if !s.active || s.session != session {
                            return;
                        }
                        s.last_observed_flag = status.linked;
                        if status.linked {
                            // Signal before the lock is released so an inactive watcher
                            // never has its signal still in flight
                            let _ = signals.send(LinkSignal::Linked { attempt });
                            s.active = false;
                            drop(s);
                            log::info!("GitHub App installation detected on poll #{}", attempt);
                            return;
                        }
                        log::trace!("Poll #{}: installation not complete yet", attempt);
                    }
                    Err(e) => {
                        log::warn!("Poll #{}: failed to read link status: {}", attempt, e);
                    }
                }
            }
        }));

        true
    }

    /// Stop polling without emitting anything. Idempotent.
    pub fn pause(&mut self) {
        if let Some(mut task) = self.task.take() {
            task.cancel();
        }
        let mut state = self.state.lock();
        if state.active {
            log::debug!("Installation poll paused after {} attempts", state.attempt);
            state.active = false;
        }
    }
}

impl Drop for InstallationWatcher {
    fn drop(&mut self) {
        self.pause();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::api::{InstalledRepository, LinkStatus, PlatformApiError, Result};
    use crate::source::descriptor::Branch;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Reports `linked: true` from call number `linked_on` onward (never if 0)
    struct StubAccount {
        calls: AtomicU32,
        linked_on: u32,
        fail_on: Option<u32>,
    }

    impl StubAccount {
        fn new(linked_on: u32) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicU32::new(0),
                linked_on,
                fail_on: None,
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ConnectedAccountApi for StubAccount {
        async fn list_installed_repositories(&self) -> Result<Vec<InstalledRepository>> {
            Ok(vec![])
        }

        async fn list_installation_branches(&self, _: &str, _: &str, _: &str) -> Result<Vec<Branch>> {
            Ok(vec![])
        }

        async fn get_linked_account_status(&self, _: &str) -> Result<LinkStatus> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_on == Some(call) {
                return Err(PlatformApiError::RateLimited);
            }
            Ok(LinkStatus {
                linked: self.linked_on != 0 && call >= self.linked_on,
            })
        }
    }

    fn watcher(stub: Arc<StubAccount>) -> (InstallationWatcher, mpsc::UnboundedReceiver<LinkSignal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (InstallationWatcher::new(stub, "platform-1", tx), rx)
    }

    const TICK: Duration = Duration::from_millis(800);

    #[tokio::test(start_paused = true)]
    async fn test_pause_when_inactive_is_noop() {
        let stub = StubAccount::new(0);
        let (mut watcher, mut rx) = watcher(stub.clone());

        let before = watcher.state();
        watcher.pause();
        watcher.pause();
        assert_eq!(watcher.state(), before);

        tokio::time::sleep(TICK * 5).await;
        assert_eq!(stub.calls(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_poll_runs_one_timer() {
        let stub = StubAccount::new(0);
        let (mut watcher, _rx) = watcher(stub.clone());

        assert!(watcher.poll(TICK));
        assert!(!watcher.poll(TICK));
        assert!(watcher.is_active());

        tokio::time::sleep(TICK * 3 + Duration::from_millis(10)).await;
        assert_eq!(stub.calls(), 3);
        assert_eq!(watcher.state().attempt, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_stops_ticks_without_signal() {
        let stub = StubAccount::new(0);
        let (mut watcher, mut rx) = watcher(stub.clone());

        watcher.poll(TICK);
        tokio::time::sleep(TICK + Duration::from_millis(10)).await;
        assert_eq!(stub.calls(), 1);

        watcher.pause();
        let paused = watcher.state();
        assert!(!paused.active);
        watcher.pause();
        assert_eq!(watcher.state(), paused);

        tokio::time::sleep(TICK * 10).await;
        assert_eq!(stub.calls(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_linked_on_fifth_tick() {
        let stub = StubAccount::new(5);
        let (mut watcher, mut rx) = watcher(stub.clone());

        watcher.poll(TICK);
        let signal = rx.recv().await.unwrap();
        assert_eq!(signal, LinkSignal::Linked { attempt: 5 });

        let state = watcher.state();
        assert!(!state.active);
        assert!(state.last_observed_flag);

        tokio::time::sleep(TICK * 10).await;
        assert_eq!(stub.calls(), 5);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_tick_keeps_polling() {
        let stub = Arc::new(StubAccount {
            calls: AtomicU32::new(0),
            linked_on: 3,
            fail_on: Some(2),
        });
        let (mut watcher, mut rx) = watcher(stub.clone());

        watcher.poll(TICK);
        assert_eq!(rx.recv().await, Some(LinkSignal::Linked { attempt: 3 }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_timer() {
        let stub = StubAccount::new(0);
        let (mut watcher, _rx) = watcher(stub.clone());
        watcher.poll(TICK);
        drop(watcher);

        tokio::time::sleep(TICK * 5).await;
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_again_after_pause() {
        let stub = StubAccount::new(0);
        let (mut watcher, _rx) = watcher(stub.clone());

        watcher.poll(TICK);
        watcher.pause();
        assert!(watcher.poll(TICK));

        tokio::time::sleep(TICK * 2 + Duration::from_millis(10)).await;
        assert_eq!(stub.calls(), 2);
    }
}
