//! Source repository resolution
//!
//! Everything needed to turn user input into a `SourceDescriptor`: pasted
//! link lookup, connected-account browsing, branch selection and the
//! installation watcher.

pub mod browser;
pub mod debounce;
pub mod descriptor;
pub mod resolver;
pub mod task;
pub mod watcher;

pub use browser::{matches_filter, BranchList, ConnectedRepositoryBrowser, ConnectionStatus};
pub use debounce::{Debouncer, Due};
pub use descriptor::{Branch, CodeHostProvider, RepoIdentity, SourceDescriptor};
pub use resolver::{
    Notice, RepositoryLinkResolver, ResolverSettings, ResolverStage, ResolverUpdate,
    DEFAULT_DEBOUNCE, DEFAULT_POLL_INTERVAL,
};
pub use task::TaskHandle;
pub use watcher::{InstallationPollState, InstallationWatcher, LinkSignal};
