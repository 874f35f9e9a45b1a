//! Source descriptor model
//!
//! Identifies the repository and branch a service deploys from.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported code hosts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CodeHostProvider {
    #[default]
    Github,
}

impl CodeHostProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeHostProvider::Github => "github",
        }
    }

    /// Browser URL for a repository on this host
    pub fn repository_url(&self, owner: &str, repo: &str) -> String {
        match self {
            CodeHostProvider::Github => format!("https://github.com/{}/{}", owner, repo),
        }
    }
}

/// Canonical identity of a public repository, as returned by the code host
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepoIdentity {
    pub id: String,
    pub owner: String,
    pub repo: String,
}

impl RepoIdentity {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// A branch name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Branch {
    pub name: String,
}

impl Branch {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Resolved repository + branch used as a service's deployment source.
///
/// `installation_id` is set exactly when the repository came through the
/// connected GitHub App (`private == true`). The constructors are the only way
/// to pick a repository, so the pairing always holds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SourceDescriptor {
    provider: CodeHostProvider,
    owner: String,
    repo: String,
    repo_id: String,
    branch: String,
    private: bool,
    installation_id: Option<String>,
}

impl SourceDescriptor {
    /// Empty descriptor, as held while nothing is selected
    pub fn empty() -> Self {
        Self::default()
    }

    /// A public repository found through a link lookup
    pub fn public(identity: &RepoIdentity) -> Self {
        Self {
            provider: CodeHostProvider::Github,
            owner: identity.owner.clone(),
            repo: identity.repo.clone(),
            repo_id: identity.id.clone(),
            branch: String::new(),
            private: false,
            installation_id: None,
        }
    }

    /// A repository reached through an app installation
    pub fn installed(
        repo_id: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        installation_id: impl Into<String>,
    ) -> Self {
        Self {
            provider: CodeHostProvider::Github,
            owner: owner.into(),
            repo: repo.into(),
            repo_id: repo_id.into(),
            branch: String::new(),
            private: true,
            installation_id: Some(installation_id.into()),
        }
    }

    /// Second stage: fix the branch
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn provider(&self) -> CodeHostProvider {
        self.provider
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn repo_id(&self) -> &str {
        &self.repo_id
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn is_private(&self) -> bool {
        self.private
    }

    pub fn installation_id(&self) -> Option<&str> {
        self.installation_id.as_deref()
    }

    /// True once a repository has been picked
    pub fn has_repository(&self) -> bool {
        !self.repo_id.is_empty()
    }

    /// True once both stages are done
    pub fn is_complete(&self) -> bool {
        self.has_repository() && !self.branch.is_empty()
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    pub fn url(&self) -> String {
        self.provider.repository_url(&self.owner, &self.repo)
    }
}

impl fmt::Display for SourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.branch.is_empty() {
            write!(f, "{}", self.full_name())
        } else {
            write!(f, "{}@{}", self.full_name(), self.branch)
        }
    }
}
