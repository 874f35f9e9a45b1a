//! GitHub REST client for public repository lookups

use super::CodeHost;
use crate::platform::api::client::error_from_response;
use crate::platform::api::{PlatformApiError, Result};
use crate::source::descriptor::{Branch, RepoIdentity};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// Public GitHub API URL
pub const GITHUB_API_URL: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("provision-wizard/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct GitHubOwner {
    login: String,
}

#[derive(Debug, Deserialize)]
struct GitHubRepository {
    id: u64,
    name: String,
    owner: GitHubOwner,
}

#[derive(Debug, Deserialize)]
struct GitHubBranch {
    name: String,
}

/// Unauthenticated GitHub client
pub struct GitHubClient {
    http_client: Client,
    api_url: String,
}

impl GitHubClient {
    pub fn new() -> Result<Self> {
        Self::with_url(GITHUB_API_URL)
    }

    pub fn with_url(api_url: impl Into<String>) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(USER_AGENT)
            .build()
            .map_err(PlatformApiError::HttpError)?;

        Ok(Self {
            http_client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn repo_path(owner: &str, repo: &str) -> String {
        format!(
            "/repos/{}/{}",
            urlencoding::encode(owner),
            urlencoding::encode(repo)
        )
    }

    async fn send(&self, path: &str) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.api_url, path);
        log::debug!("GET {}", url);
        let response = self
            .http_client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;
        Ok(response)
    }
}

#[async_trait]
impl CodeHost for GitHubClient {
    async fn get_repository(&self, owner: &str, repo: &str) -> Result<Option<RepoIdentity>> {
        let response = self.send(&Self::repo_path(owner, repo)).await?;

        // Private repositories also answer 404 to anonymous callers
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let repository: GitHubRepository = response
            .json()
            .await
            .map_err(|e| PlatformApiError::ParseError(e.to_string()))?;

        Ok(Some(RepoIdentity {
            id: repository.id.to_string(),
            owner: repository.owner.login,
            repo: repository.name,
        }))
    }

    async fn list_branches(&self, owner: &str, repo: &str) -> Result<Vec<Branch>> {
        let path = format!("{}/branches?per_page=100", Self::repo_path(owner, repo));
        let response = self.send(&path).await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let branches: Vec<GitHubBranch> = response
            .json()
            .await
            .map_err(|e| PlatformApiError::ParseError(e.to_string()))?;

        Ok(branches.into_iter().map(|b| Branch::new(b.name)).collect())
    }
}
