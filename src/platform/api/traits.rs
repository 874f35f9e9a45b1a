//! Collaborator seams the wizard and resolver depend on
//!
//! `PlatformApiClient` implements all three; tests substitute in-memory stubs.

use super::error::Result;
use super::types::{
    BuildPack, CreateServiceRequest, InstalledRepository, LinkStatus, PackFilter, Service,
};
use crate::source::descriptor::Branch;
use async_trait::async_trait;

/// Creates services from a finished wizard
#[async_trait]
pub trait ProvisioningApi: Send + Sync {
    async fn create_service(&self, request: &CreateServiceRequest) -> Result<Service>;
}

/// Build-pack catalog search
#[async_trait]
pub trait BuildPackCatalog: Send + Sync {
    async fn search_packs(&self, filter: &PackFilter) -> Result<Vec<BuildPack>>;
}

/// Repositories and link state of the connected GitHub App installation
#[async_trait]
pub trait ConnectedAccountApi: Send + Sync {
    async fn list_installed_repositories(&self) -> Result<Vec<InstalledRepository>>;

    async fn list_installation_branches(
        &self,
        installation_id: &str,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<Branch>>;

    /// Whether the account behind `account_id` has finished installing the app
    async fn get_linked_account_status(&self, account_id: &str) -> Result<LinkStatus>;
}
