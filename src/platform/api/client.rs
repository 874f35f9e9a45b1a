//! Platform API client
//!
//! Provides authenticated access to the platform API for provisioning services,
//! searching the build-pack catalog and browsing the connected GitHub account.

use super::error::{PlatformApiError, Result};
use super::traits::{BuildPackCatalog, ConnectedAccountApi, ProvisioningApi};
use super::types::{
    ApiErrorResponse, BranchesResponse, BuildPack, CreateServiceRequest, GenericResponse,
    InstalledRepositoriesResponse, InstalledRepository, LinkStatus, PackFilter,
    PackSearchResponse, Platform, Service,
};
use crate::source::descriptor::Branch;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Production API URL
pub const PLATFORM_API_URL_PROD: &str = "https://api.example-paas.dev";
/// Development API URL
pub const PLATFORM_API_URL_DEV: &str = "http://localhost:7700";

/// User agent for API requests
const USER_AGENT: &str = concat!("provision-wizard/", env!("CARGO_PKG_VERSION"));

/// Client for interacting with the platform API
pub struct PlatformApiClient {
    /// HTTP client with configured timeout and headers
    http_client: Client,
    /// Base API URL
    api_url: String,
    /// Session token, passed in explicitly by the caller
    token: Option<String>,
}

impl PlatformApiClient {
    /// Create a client for the given API URL and session token
    pub fn with_url(api_url: impl Into<String>, token: Option<String>) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(USER_AGENT)
            .build()
            .map_err(PlatformApiError::HttpError)?;

        Ok(Self {
            http_client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Get the configured API URL
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn auth_token(&self) -> Result<&str> {
        self.token.as_deref().ok_or(PlatformApiError::Unauthorized)
    }

    /// Make an authenticated GET request
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let token = self.auth_token()?;
        let url = format!("{}{}", self.api_url, path);
        log::debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Make an authenticated POST request with a JSON body
    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let token = self.auth_token()?;
        let url = format!("{}{}", self.api_url, path);
        log::debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle the HTTP response, converting errors appropriately
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        if response.status().is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| PlatformApiError::ParseError(e.to_string()))
        } else {
            Err(error_from_response(response).await)
        }
    }

    // =========================================================================
    // Platform API methods
    // =========================================================================

    /// Get a platform snapshot (domains, existing services, GitHub link state)
    ///
    /// Endpoint: GET /api/platforms/:id
    pub async fn get_platform(&self, id: &str) -> Result<Platform> {
        let response: GenericResponse<Platform> = self
            .get(&format!("/api/platforms/{}", urlencoding::encode(id)))
            .await?;
        Ok(response.data)
    }
}

/// Turn a non-success response into a typed error, reading the body for a message
pub(crate) async fn error_from_response(response: reqwest::Response) -> PlatformApiError {
    let status_code = response.status().as_u16();
    let error_body = response.text().await.unwrap_or_default();
    let error_message = serde_json::from_str::<ApiErrorResponse>(&error_body)
        .map(|e| e.get_message())
        .unwrap_or(error_body);
    log::warn!("API request failed ({}): {}", status_code, error_message);
    PlatformApiError::from_status(status_code, error_message)
}

#[async_trait]
impl ProvisioningApi for PlatformApiClient {
    /// Endpoint: POST /api/services
    async fn create_service(&self, request: &CreateServiceRequest) -> Result<Service> {
        let response: GenericResponse<Service> = self.post("/api/services", request).await?;
        Ok(response.data)
    }
}

#[async_trait]
impl BuildPackCatalog for PlatformApiClient {
    /// Endpoint: GET /api/packs?provider=&type=&service=
    async fn search_packs(&self, filter: &PackFilter) -> Result<Vec<BuildPack>> {
        let response: GenericResponse<PackSearchResponse> = self
            .get(&format!("/api/packs{}", filter.to_query()))
            .await?;
        Ok(response.data.packs)
    }
}

#[async_trait]
impl ConnectedAccountApi for PlatformApiClient {
    /// Endpoint: GET /api/github/repositories
    async fn list_installed_repositories(&self) -> Result<Vec<InstalledRepository>> {
        let response: GenericResponse<InstalledRepositoriesResponse> =
            self.get("/api/github/repositories").await?;
        Ok(response.data.repositories)
    }

    /// Endpoint: GET /api/github/installations/:installationId/repos/:owner/:repo/branches
    async fn list_installation_branches(
        &self,
        installation_id: &str,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<Branch>> {
        let path = format!(
            "/api/github/installations/{}/repos/{}/{}/branches",
            urlencoding::encode(installation_id),
            urlencoding::encode(owner),
            urlencoding::encode(repo)
        );
        let response: GenericResponse<BranchesResponse> = self.get(&path).await?;
        Ok(response.data.branches)
    }

    async fn get_linked_account_status(&self, account_id: &str) -> Result<LinkStatus> {
        let platform = self.get_platform(account_id).await?;
        Ok(LinkStatus {
            linked: platform.has_connected_github_app,
        })
    }
}
