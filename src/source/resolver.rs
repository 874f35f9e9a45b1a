//! Repository link resolver
//!
//! Two-path flow that ends in a `SourceDescriptor`:
//!
//! * **Public link**: the user pastes a URL, it is parsed, debounced and looked
//!   up on the code host. Only the latest lookup may change what is shown.
//! * **Connected account**: repositories come from the GitHub App
//!   installation. When the app is not installed yet, `connect()` starts the
//!   installation watcher and the list is fetched as soon as it reports back.
//!
//! Either path moves into branch selection; picking a branch resolves.
//!
//! Background work reports through channels. Call [`RepositoryLinkResolver::pump`]
//! to apply the next event.

use super::browser::{BranchList, ConnectedRepositoryBrowser, ConnectionStatus};
use super::debounce::{Debouncer, Due};
use super::descriptor::{RepoIdentity, SourceDescriptor};
use super::task::TaskHandle;
use super::watcher::{InstallationPollState, InstallationWatcher, LinkSignal};
use crate::github::{parse_repo_url, CodeHost, RepoRef, UrlParseError};
use crate::platform::api::{ConnectedAccountApi, InstalledRepository, PlatformApiError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Default quiet period before a pasted link is looked up
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(600);
/// Default link-status poll interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(800);

/// Timing and URLs the resolver needs
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    pub debounce: Duration,
    pub poll_interval: Duration,
    /// Page where the user installs the GitHub App
    pub installation_url: String,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            poll_interval: DEFAULT_POLL_INTERVAL,
            installation_url: "https://github.com/apps/provision-bot/installations/new".to_string(),
        }
    }
}

/// Where resolution currently stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverStage {
    RepoSelection,
    BranchSelection,
    Resolved(SourceDescriptor),
}

/// Non-fatal message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The pasted link could not be parsed; nothing was requested
    InvalidLink(UrlParseError),
    /// The code host has no public repository by that name
    NotFound(RepoRef),
    /// A request failed; the action can be retried
    RequestFailed { action: &'static str, message: String },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::InvalidLink(e) => write!(f, "{}", e),
            Notice::NotFound(query) => write!(
                f,
                "Could not find a matching repository in GitHub ({})",
                query.full_name()
            ),
            Notice::RequestFailed { action, message } => write!(f, "Failed to {}: {}", action, message),
        }
    }
}

/// What a processed background event changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverUpdate {
    /// A debounced link went out to the code host
    LookupStarted(RepoRef),
    Matched(RepoIdentity),
    NotFound(RepoRef),
    /// A superseded response arrived and was dropped
    Stale,
    /// The app installation completed and the repository list was fetched
    Connected { repositories: usize },
    Failed(Notice),
}

#[derive(Debug)]
struct LookupOutcome {
    generation: u64,
    query: RepoRef,
    result: Result<Option<RepoIdentity>, PlatformApiError>,
}

enum Event {
    Due(Due<RepoRef>),
    Lookup(LookupOutcome),
    Link(LinkSignal),
}

/// Public-link side of repository selection
#[derive(Debug, Default)]
struct PublicLink {
    input: String,
    /// Parsed query of the most recent valid input
    query: Option<RepoRef>,
    matched: Option<RepoIdentity>,
    loading: bool,
}

pub struct RepositoryLinkResolver {
    code_host: Arc<dyn CodeHost>,
    accounts: Arc<dyn ConnectedAccountApi>,
    settings: ResolverSettings,

    stage: ResolverStage,
    draft: SourceDescriptor,
    notice: Option<Notice>,

    link: PublicLink,
    debouncer: Debouncer<RepoRef>,
    due_rx: mpsc::UnboundedReceiver<Due<RepoRef>>,
    lookup_tx: mpsc::UnboundedSender<LookupOutcome>,
    lookup_rx: mpsc::UnboundedReceiver<LookupOutcome>,
    lookups: Vec<TaskHandle>,

    browser: ConnectedRepositoryBrowser,
    watcher: InstallationWatcher,
    link_rx: mpsc::UnboundedReceiver<LinkSignal>,

    branches: BranchList,
}

impl RepositoryLinkResolver {
    /// Mount a resolver for one platform.
    ///
    /// `account_id` is the platform whose link flag is polled; `connected` is
    /// its current flag from the platform snapshot.
    pub fn new(
        code_host: Arc<dyn CodeHost>,
        accounts: Arc<dyn ConnectedAccountApi>,
        account_id: impl Into<String>,
        connected: bool,
        settings: ResolverSettings,
    ) -> Self {
        let (debouncer, due_rx) = Debouncer::new(settings.debounce);
        let (lookup_tx, lookup_rx) = mpsc::unbounded_channel();
        let (link_tx, link_rx) = mpsc::unbounded_channel();

        Self {
            browser: ConnectedRepositoryBrowser::new(accounts.clone(), connected),
            watcher: InstallationWatcher::new(accounts.clone(), account_id, link_tx),
            code_host,
            accounts,
            settings,
            stage: ResolverStage::RepoSelection,
            draft: SourceDescriptor::empty(),
            notice: None,
            link: PublicLink::default(),
            debouncer,
            due_rx,
            lookup_tx,
            lookup_rx,
            lookups: Vec::new(),
            link_rx,
            branches: BranchList::default(),
        }
    }

    /// Initial load: fetch repositories when the account is already linked
    pub async fn start(&mut self) {
        if self.browser.is_connected() {
            self.refresh_repositories().await;
        }
    }

    // =========================================================================
    // State accessors
    // =========================================================================

    pub fn stage(&self) -> &ResolverStage {
        &self.stage
    }

    /// Descriptor being assembled (repository picked, branch still empty)
    pub fn draft(&self) -> &SourceDescriptor {
        &self.draft
    }

    pub fn resolved(&self) -> Option<&SourceDescriptor> {
        match &self.stage {
            ResolverStage::Resolved(source) => Some(source),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn link_input(&self) -> &str {
        &self.link.input
    }

    /// Repository the latest lookup matched
    pub fn public_match(&self) -> Option<&RepoIdentity> {
        self.link.matched.as_ref()
    }

    pub fn is_looking_up(&self) -> bool {
        self.link.loading
    }

    pub fn connection(&self) -> ConnectionStatus {
        self.browser.status()
    }

    pub fn poll_state(&self) -> InstallationPollState {
        self.watcher.state()
    }

    pub fn visible_repositories(&self) -> Vec<&InstalledRepository> {
        self.browser.visible_repositories()
    }

    pub fn branches(&self) -> &BranchList {
        &self.branches
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Something in the background will eventually produce an event
    pub fn has_pending_work(&self) -> bool {
        self.debouncer.is_pending()
            || self.lookups.iter().any(TaskHandle::is_active)
            || self.watcher.is_active()
    }

    // =========================================================================
    // Path A: public link
    // =========================================================================

    /// Feed the current contents of the link field
    pub fn input_link(&mut self, text: &str) {
        self.link.input = text.to_string();

        if text.trim().is_empty() {
            self.debouncer.supersede();
            self.link.query = None;
            self.link.matched = None;
            self.link.loading = false;
            return;
        }

        match parse_repo_url(text) {
            Ok(query) => {
                if self.notice.as_ref().is_some_and(|n| matches!(n, Notice::InvalidLink(_))) {
                    self.notice = None;
                }
                // A match only stands while the link still names it
                let same_repo = self.link.matched.as_ref().is_some_and(|m| {
                    m.owner.eq_ignore_ascii_case(&query.owner) && m.repo.eq_ignore_ascii_case(&query.repo)
                });
                if !same_repo {
                    self.link.matched = None;
                }
                self.link.query = Some(query.clone());
                let generation = self.debouncer.submit(query);
                log::trace!("Link input queued as lookup #{}", generation);
            }
            Err(e) => {
                // Invalid input also cancels whatever was pending for older input
                self.debouncer.supersede();
                self.link.query = None;
                self.link.matched = None;
                self.link.loading = false;
                self.notice = Some(Notice::InvalidLink(e));
            }
        }
    }

    /// Pick the repository the link lookup matched
    pub async fn select_public_match(&mut self) -> bool {
        let Some(identity) = self.link.matched.clone() else {
            return false;
        };
        self.enter_branch_selection(SourceDescriptor::public(&identity)).await;
        true
    }

    // =========================================================================
    // Path B: connected account
    // =========================================================================

    /// Start the out-of-band installation flow. Returns the URL the caller
    /// must open; polling for completion starts here.
    pub fn connect(&mut self) -> &str {
        self.watcher.poll(self.settings.poll_interval);
        &self.settings.installation_url
    }

    /// Stop waiting for the installation
    pub fn cancel_connect(&mut self) {
        self.watcher.pause();
    }

    pub async fn refresh_repositories(&mut self) -> bool {
        match self.browser.refresh().await {
            Ok(_) => true,
            Err(e) => {
                self.notice = Some(Notice::RequestFailed {
                    action: "list repositories",
                    message: e.to_string(),
                });
                false
            }
        }
    }

    pub fn set_repository_filter(&mut self, filter: &str) {
        self.browser.set_filter(filter);
    }

    /// Pick a repository from the installation's list
    pub async fn select_installed_repository(&mut self, repo_id: &str) -> bool {
        let Some(repo) = self.browser.find(repo_id).cloned() else {
            return false;
        };
        let draft =
            SourceDescriptor::installed(repo.id, repo.owner, repo.repo, repo.installation_id);
        self.enter_branch_selection(draft).await;
        true
    }

    // =========================================================================
    // Branch selection
    // =========================================================================

    async fn enter_branch_selection(&mut self, draft: SourceDescriptor) {
        log::debug!("Repository selected: {}", draft.full_name());
        self.draft = draft;
        self.stage = ResolverStage::BranchSelection;
        self.reload_branches().await;
    }

    /// (Re)load branches for the selected repository
    pub async fn reload_branches(&mut self) -> bool {
        if self.stage != ResolverStage::BranchSelection {
            return false;
        }
        match BranchList::load(&self.draft, self.code_host.as_ref(), self.accounts.as_ref()).await {
            Ok(branches) => {
                self.branches = branches;
                true
            }
            Err(e) => {
                self.branches = BranchList::default();
                self.notice = Some(Notice::RequestFailed {
                    action: "list branches",
                    message: e.to_string(),
                });
                false
            }
        }
    }

    pub fn set_branch_filter(&mut self, filter: &str) {
        self.branches.set_filter(filter);
    }

    /// Pick a branch and finish
    pub fn select_branch(&mut self, name: &str) -> Option<&SourceDescriptor> {
        if self.stage != ResolverStage::BranchSelection || !self.branches.contains(name) {
            return None;
        }
        let source = self.draft.clone().with_branch(name);
        log::debug!("Source resolved: {}", source);
        self.stage = ResolverStage::Resolved(source);
        self.watcher.pause();
        self.resolved()
    }

    /// Back to repository selection; connection state is untouched
    pub fn change_repository(&mut self) {
        self.stage = ResolverStage::RepoSelection;
        self.draft = SourceDescriptor::empty();
        self.branches = BranchList::default();
    }

    // =========================================================================
    // Background events
    // =========================================================================

    /// Wait for the next background event and apply it.
    ///
    /// Returns `None` immediately when nothing is pending.
    pub async fn pump(&mut self) -> Option<ResolverUpdate> {
        let event = match self.try_next_event() {
            Some(event) => event,
            // Work can finish between the two checks; its event is queued by then
            None if !self.has_pending_work() => self.try_next_event()?,
            None => {
                tokio::select! {
                    Some(due) = self.due_rx.recv() => Event::Due(due),
                    Some(outcome) = self.lookup_rx.recv() => Event::Lookup(outcome),
                    Some(signal) = self.link_rx.recv() => Event::Link(signal),
                    else => return None,
                }
            }
        };

        Some(self.apply(event).await)
    }

    /// Apply everything already queued without waiting
    pub async fn drain(&mut self) -> Vec<ResolverUpdate> {
        let mut updates = Vec::new();
        while let Some(event) = self.try_next_event() {
            updates.push(self.apply(event).await);
        }
        updates
    }

    fn try_next_event(&mut self) -> Option<Event> {
        if let Ok(signal) = self.link_rx.try_recv() {
            return Some(Event::Link(signal));
        }
        if let Ok(outcome) = self.lookup_rx.try_recv() {
            return Some(Event::Lookup(outcome));
        }
        if let Ok(due) = self.due_rx.try_recv() {
            return Some(Event::Due(due));
        }
        None
    }

    async fn apply(&mut self, event: Event) -> ResolverUpdate {
        match event {
            Event::Due(due) => self.on_lookup_due(due),
            Event::Lookup(outcome) => self.on_lookup_finished(outcome),
            Event::Link(signal) => self.on_linked(signal).await,
        }
    }

    fn on_lookup_due(&mut self, due: Due<RepoRef>) -> ResolverUpdate {
        if !self.debouncer.is_current(due.generation) {
            return ResolverUpdate::Stale;
        }

        self.lookups.retain(TaskHandle::is_active);
        self.link.loading = true;

        let code_host = self.code_host.clone();
        let tx = self.lookup_tx.clone();
        let query = due.value.clone();
        let generation = due.generation;
        log::debug!("Looking up {} (#{})", query.full_name(), generation);

        self.lookups.push(TaskHandle::spawn(async move {
            let result = code_host.get_repository(&query.owner, &query.repo).await;
            let _ = tx.send(LookupOutcome {
                generation,
                query,
                result,
            });
        }));

        ResolverUpdate::LookupStarted(due.value)
    }

    fn on_lookup_finished(&mut self, outcome: LookupOutcome) -> ResolverUpdate {
        if !self.debouncer.is_current(outcome.generation) {
            log::debug!(
                "Dropping stale lookup #{} for {}",
                outcome.generation,
                outcome.query.full_name()
            );
            return ResolverUpdate::Stale;
        }

        self.link.loading = false;
        match outcome.result {
            Ok(Some(identity)) => {
                self.link.matched = Some(identity.clone());
                ResolverUpdate::Matched(identity)
            }
            Ok(None) => {
                self.link.matched = None;
                self.notice = Some(Notice::NotFound(outcome.query.clone()));
                ResolverUpdate::NotFound(outcome.query)
            }
            Err(e) => {
                log::warn!("Repository lookup failed: {}", e);
                let notice = Notice::RequestFailed {
                    action: "ask GitHub for the repository",
                    message: e.to_string(),
                };
                self.notice = Some(notice.clone());
                ResolverUpdate::Failed(notice)
            }
        }
    }

    async fn on_linked(&mut self, signal: LinkSignal) -> ResolverUpdate {
        let LinkSignal::Linked { attempt } = signal;
        log::debug!("Account linked (poll #{}), loading repositories", attempt);
        self.browser.mark_connected();

        match self.browser.refresh().await {
            Ok(count) => ResolverUpdate::Connected { repositories: count },
            Err(e) => {
                let notice = Notice::RequestFailed {
                    action: "list repositories",
                    message: e.to_string(),
                };
                self.notice = Some(notice.clone());
                ResolverUpdate::Failed(notice)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::api::{LinkStatus, Result};
    use crate::source::descriptor::Branch;
    use async_trait::async_trait;

    struct StubHost;

    #[async_trait]
    impl CodeHost for StubHost {
        async fn get_repository(&self, owner: &str, repo: &str) -> Result<Option<RepoIdentity>> {
            if repo == "missing" {
                return Ok(None);
            }
            if repo == "broken" {
                return Err(PlatformApiError::RateLimited);
            }
            Ok(Some(RepoIdentity {
                id: format!("id-{}", repo),
                owner: owner.to_string(),
                repo: repo.to_string(),
            }))
        }

        async fn list_branches(&self, _: &str, _: &str) -> Result<Vec<Branch>> {
            Ok(vec![Branch::new("main")])
        }
    }

    struct StubAccount;

    #[async_trait]
    impl ConnectedAccountApi for StubAccount {
        async fn list_installed_repositories(&self) -> Result<Vec<InstalledRepository>> {
            Ok(vec![InstalledRepository {
                id: "r1".into(),
                owner: "acme".into(),
                repo: "private".into(),
                installation_id: "inst".into(),
            }])
        }

        async fn list_installation_branches(&self, _: &str, _: &str, _: &str) -> Result<Vec<Branch>> {
            Ok(vec![Branch::new("trunk")])
        }

        async fn get_linked_account_status(&self, _: &str) -> Result<LinkStatus> {
            Ok(LinkStatus { linked: false })
        }
    }

    fn resolver(connected: bool) -> RepositoryLinkResolver {
        RepositoryLinkResolver::new(
            Arc::new(StubHost),
            Arc::new(StubAccount),
            "platform-1",
            connected,
            ResolverSettings::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_link_never_requests() {
        let mut resolver = resolver(false);
        resolver.input_link("https://gitlab.com/acme/widget");

        assert!(matches!(resolver.notice(), Some(Notice::InvalidLink(_))));
        assert!(!resolver.has_pending_work());
        assert_eq!(resolver.pump().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_keeps_repo_selection() {
        let mut resolver = resolver(false);
        resolver.input_link("acme/missing");

        assert!(matches!(resolver.pump().await, Some(ResolverUpdate::LookupStarted(_))));
        assert!(matches!(resolver.pump().await, Some(ResolverUpdate::NotFound(_))));
        assert_eq!(resolver.stage(), &ResolverStage::RepoSelection);
        assert!(matches!(resolver.notice(), Some(Notice::NotFound(q)) if q.repo == "missing"));
        assert!(!resolver.select_public_match().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_failure_is_notice() {
        let mut resolver = resolver(false);
        resolver.input_link("acme/broken");
        resolver.pump().await;

        let update = resolver.pump().await;
        assert!(matches!(update, Some(ResolverUpdate::Failed(Notice::RequestFailed { .. }))));
        assert_eq!(resolver.stage(), &ResolverStage::RepoSelection);
        assert!(!resolver.is_looking_up());
    }

    #[tokio::test(start_paused = true)]
    async fn test_keystrokes_collapse_into_one_lookup() {
        let mut resolver = resolver(false);
        for partial in ["acme/w", "acme/wi", "acme/wid", "acme/widget"] {
            resolver.input_link(partial);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        let started = resolver.pump().await;
        assert_eq!(
            started,
            Some(ResolverUpdate::LookupStarted(RepoRef {
                owner: "acme".into(),
                repo: "widget".into()
            }))
        );
        assert!(matches!(resolver.pump().await, Some(ResolverUpdate::Matched(m)) if m.repo == "widget"));
        assert_eq!(resolver.pump().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_change_repository_keeps_connection() {
        let mut resolver = resolver(true);
        resolver.start().await;
        assert!(resolver.select_installed_repository("r1").await);
        assert_eq!(resolver.stage(), &ResolverStage::BranchSelection);
        assert_eq!(resolver.branches().all(), &[Branch::new("trunk")]);

        resolver.change_repository();
        assert_eq!(resolver.stage(), &ResolverStage::RepoSelection);
        assert_eq!(resolver.connection(), ConnectionStatus::Connected);
        assert!(!resolver.draft().has_repository());
        assert_eq!(resolver.visible_repositories().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_unknown_branch_is_rejected() {
        let mut resolver = resolver(true);
        resolver.start().await;
        resolver.select_installed_repository("r1").await;

        assert!(resolver.select_branch("nope").is_none());
        let source = resolver.select_branch("trunk").unwrap();
        assert!(source.is_private());
        assert_eq!(source.installation_id(), Some("inst"));
        assert_eq!(source.branch(), "trunk");
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_is_idempotent() {
        let mut resolver = resolver(false);
        let url = resolver.connect().to_string();
        assert!(url.contains("installations/new"));
        resolver.connect();
        assert!(resolver.poll_state().active);

        resolver.cancel_connect();
        assert!(!resolver.poll_state().active);
        assert!(!resolver.has_pending_work());
    }
}
