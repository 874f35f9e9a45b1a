//! Connected repository browser
//!
//! Lists repositories visible through the GitHub App installation, plus the
//! branch list used by both resolution paths. Filtering is client-side.

use crate::github::CodeHost;
use crate::platform::api::{ConnectedAccountApi, InstalledRepository, Result};
use crate::source::descriptor::{Branch, SourceDescriptor};
use std::sync::Arc;

/// Case-insensitive substring match; an empty filter matches everything
pub fn matches_filter(haystack: &str, filter: &str) -> bool {
    let filter = filter.trim();
    filter.is_empty() || haystack.to_lowercase().contains(&filter.to_lowercase())
}

/// Whether the platform has a completed GitHub App installation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    NotConnected,
    Connected,
}

pub struct ConnectedRepositoryBrowser {
    accounts: Arc<dyn ConnectedAccountApi>,
    status: ConnectionStatus,
    repositories: Vec<InstalledRepository>,
    filter: String,
}

impl ConnectedRepositoryBrowser {
    pub fn new(accounts: Arc<dyn ConnectedAccountApi>, connected: bool) -> Self {
        Self {
            accounts,
            status: if connected {
                ConnectionStatus::Connected
            } else {
                ConnectionStatus::NotConnected
            },
            repositories: Vec::new(),
            filter: String::new(),
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    pub fn mark_connected(&mut self) {
        self.status = ConnectionStatus::Connected;
    }

    /// Re-fetch the repository list. On failure the previous list is kept.
    pub async fn refresh(&mut self) -> Result<usize> {
        let repositories = self.accounts.list_installed_repositories().await?;
        log::debug!("Loaded {} installed repositories", repositories.len());
        self.repositories = repositories;
        Ok(self.repositories.len())
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn repositories(&self) -> &[InstalledRepository] {
        &self.repositories
    }

    /// Repositories whose `owner/repo` contains the filter
    pub fn visible_repositories(&self) -> Vec<&InstalledRepository> {
        self.repositories
            .iter()
            .filter(|r| matches_filter(&r.full_name(), &self.filter))
            .collect()
    }

    pub fn find(&self, repo_id: &str) -> Option<&InstalledRepository> {
        self.repositories.iter().find(|r| r.id == repo_id)
    }
}

/// Branches of the selected repository
#[derive(Debug, Clone, Default)]
pub struct BranchList {
    branches: Vec<Branch>,
    filter: String,
}

impl BranchList {
    /// Fetch branches from the listing that matches how the repository was
    /// picked: installation-scoped for private repositories, public otherwise
    pub async fn load(
        source: &SourceDescriptor,
        code_host: &dyn CodeHost,
        accounts: &dyn ConnectedAccountApi,
    ) -> Result<Self> {
        let branches = match source.installation_id() {
            Some(installation_id) => {
                accounts
                    .list_installation_branches(installation_id, source.owner(), source.repo())
                    .await?
            }
            None => code_host.list_branches(source.owner(), source.repo()).await?,
        };
        Ok(Self {
            branches,
            filter: String::new(),
        })
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    pub fn all(&self) -> &[Branch] {
        &self.branches
    }

    pub fn visible(&self) -> Vec<&Branch> {
        self.branches
            .iter()
            .filter(|b| matches_filter(&b.name, &self.filter))
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.branches.iter().any(|b| b.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::api::LinkStatus;
    use crate::source::descriptor::RepoIdentity;
    use async_trait::async_trait;
    use proptest::prelude::*;

    struct StubAccount;

    #[async_trait]
    impl ConnectedAccountApi for StubAccount {
        async fn list_installed_repositories(&self) -> Result<Vec<InstalledRepository>> {
            Ok(vec![
                repo("1", "Acme", "Widget"),
                repo("2", "acme", "gadget"),
                repo("3", "other", "widget-docs"),
            ])
        }

        async fn list_installation_branches(&self, installation_id: &str, _: &str, _: &str) -> Result<Vec<Branch>> {
            Ok(vec![Branch::new(format!("private-{}", installation_id))])
        }

        async fn get_linked_account_status(&self, _: &str) -> Result<LinkStatus> {
            Ok(LinkStatus { linked: true })
        }
    }

    struct StubHost;

    #[async_trait]
    impl CodeHost for StubHost {
        async fn get_repository(&self, _: &str, _: &str) -> Result<Option<RepoIdentity>> {
            Ok(None)
        }

        async fn list_branches(&self, _: &str, _: &str) -> Result<Vec<Branch>> {
            Ok(vec![Branch::new("main"), Branch::new("Dev"), Branch::new("release/1.0")])
        }
    }

    fn repo(id: &str, owner: &str, name: &str) -> InstalledRepository {
        InstalledRepository {
            id: id.into(),
            owner: owner.into(),
            repo: name.into(),
            installation_id: "inst-1".into(),
        }
    }

    #[tokio::test]
    async fn test_filter_is_case_insensitive_on_full_name() {
        let mut browser = ConnectedRepositoryBrowser::new(Arc::new(StubAccount), true);
        assert_eq!(browser.refresh().await.unwrap(), 3);

        browser.set_filter("WIDGET");
        let visible: Vec<&str> = browser.visible_repositories().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(visible, vec!["1", "3"]);

        browser.set_filter("acme/g");
        let visible: Vec<&str> = browser.visible_repositories().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(visible, vec!["2"]);

        browser.set_filter("");
        assert_eq!(browser.visible_repositories().len(), 3);
    }

    #[tokio::test]
    async fn test_branch_source_follows_path() {
        let public = SourceDescriptor::public(&RepoIdentity {
            id: "1".into(),
            owner: "acme".into(),
            repo: "widget".into(),
        });
        let mut branches = BranchList::load(&public, &StubHost, &StubAccount).await.unwrap();
        assert_eq!(branches.all().len(), 3);
        branches.set_filter("dev");
        assert_eq!(branches.visible(), vec![&Branch::new("Dev")]);

        let private = SourceDescriptor::installed("2", "acme", "secret", "inst-9");
        let branches = BranchList::load(&private, &StubHost, &StubAccount).await.unwrap();
        assert!(branches.contains("private-inst-9"));
    }

    proptest! {
        #[test]
        fn prop_filter_ignores_case(haystack in "[a-zA-Z/-]{0,20}", start in 0usize..20, len in 0usize..8) {
            let start = start.min(haystack.len());
            let end = (start + len).min(haystack.len());
            let needle = &haystack[start..end];
            prop_assert!(matches_filter(&haystack, needle));
            prop_assert!(matches_filter(&haystack.to_uppercase(), &needle.to_lowercase()));
        }
    }
}
