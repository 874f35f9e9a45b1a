//! # Provision Wizard
//!
//! Command-line service provisioning for a platform-as-a-service dashboard.
//!
//! ## Features
//!
//! - **Service Wizard**: Step-by-step creation of a service (name, build target, domain, source, pack config)
//! - **Repository Resolution**: Public link lookup with debouncing, or browsing a connected GitHub account
//! - **Installation Polling**: Waits for the GitHub App installation to complete
//! - **Build Pack Catalog**: Filter packs by provider and service kind
//!
//! ## Example
//!
//! ```rust,no_run
//! use provision_wizard::wizard::is_compatible;
//! use provision_wizard::platform::api::{CloudProvider, HostingService, ServiceKind};
//!
//! assert!(is_compatible(ServiceKind::Api, CloudProvider::Aws, HostingService::Lambda));
//! ```

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod handlers;
pub mod platform;
pub mod source;
pub mod wizard;

pub use error::{ConfigError, Result};
pub use handlers::*;
use cli::{AuthCommand, Commands, PlatformCommand};
use config::types::Config;

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub async fn run_command(command: Commands, config: &Config) -> anyhow::Result<()> {
    match command {
        Commands::CreateService { platform } => handlers::handle_create_service(config, platform).await,
        Commands::Packs { provider, kind } => handlers::handle_packs(config, provider, kind).await,
        Commands::Auth { command } => match command {
            AuthCommand::Login { token, email, expires_in } => {
                handlers::handle_login(&token, email.as_deref(), expires_in)
            }
            AuthCommand::Logout => handlers::handle_logout(),
            AuthCommand::Status => handlers::handle_status(),
        },
        Commands::Platform { command } => match command {
            PlatformCommand::Use { id } => handlers::handle_platform_use(config, &id).await,
            PlatformCommand::Show => handlers::handle_platform_show(),
        },
    }
}
