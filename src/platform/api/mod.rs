//! Platform API client module
//!
//! Provides authenticated access to the platform API: service creation, the
//! build-pack catalog and the connected GitHub account.
//!
//! # Example
//!
//! ```rust,ignore
//! use provision_wizard::platform::api::{BuildPackCatalog, PackFilter, PlatformApiClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PlatformApiClient::with_url("https://api.example-paas.dev", Some(token))?;
//!
//!     for pack in client.search_packs(&PackFilter::default()).await? {
//!         println!("Pack: {}", pack.name);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items
pub use client::PlatformApiClient;
pub use error::{PlatformApiError, Result};
pub use traits::{BuildPackCatalog, ConnectedAccountApi, ProvisioningApi};
pub use types::{
    BuildPack, BuildPackRef, CloudProvider, ConfigValue, CreateServiceRequest, Domain, EnvVar,
    HostingService, InputKind, InstalledRepository, Language, LinkStatus, PackConfig, PackFilter,
    PackInput, PackVersion, Platform, Service, ServiceKind, ServiceSummary, Tag,
};
