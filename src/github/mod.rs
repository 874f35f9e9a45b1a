//! Code-host access for public repositories
//!
//! Resolves a pasted link to a canonical repository identity and lists its
//! branches, without any account connection.

pub mod client;
pub mod url;

pub use client::GitHubClient;
pub use url::{parse_repo_url, RepoRef, UrlParseError};

use crate::platform::api::Result;
use crate::source::descriptor::{Branch, RepoIdentity};
use async_trait::async_trait;

/// Public repository lookups on the code host
#[async_trait]
pub trait CodeHost: Send + Sync {
    /// Look up a repository; `Ok(None)` when it does not exist or is not public
    async fn get_repository(&self, owner: &str, repo: &str) -> Result<Option<RepoIdentity>>;

    /// List branches of a public repository
    async fn list_branches(&self, owner: &str, repo: &str) -> Result<Vec<Branch>>;
}
