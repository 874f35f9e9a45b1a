// Handler modules
pub mod auth;
pub mod packs;
pub mod platform;
pub mod service;

pub use auth::{handle_login, handle_logout, handle_status};
pub use packs::handle_packs;
pub use platform::{handle_platform_show, handle_platform_use};
pub use service::handle_create_service;

use crate::config::types::Config;
use crate::platform::api::PlatformApiClient;
use anyhow::{Context, Result};

/// Authenticated platform client built from config and stored credentials
pub(crate) fn platform_client(config: &Config) -> Result<PlatformApiClient> {
    let token = crate::auth::get_access_token();
    if token.is_none() {
        log::debug!("No valid session token stored");
    }
    PlatformApiClient::with_url(config.api.platform_url(), token)
        .context("Failed to create platform API client")
}
