//! API types for the platform API
//!
//! These types mirror the backend DTOs for platforms, build packs and services.

use crate::source::descriptor::{Branch, SourceDescriptor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Generic API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericResponse<T> {
    /// The response data
    pub data: T,
}

/// API error response format
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    /// Error message
    pub error: Option<String>,
    /// Detailed error message
    pub message: Option<String>,
    /// Extra details (platform API only)
    pub details: Option<String>,
}

impl ApiErrorResponse {
    /// Get the error message, preferring `details`, then `message`, then `error`
    pub fn get_message(&self) -> String {
        self.details
            .clone()
            .or_else(|| self.message.clone())
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}

// =============================================================================
// Deployment axes
// =============================================================================

/// Cloud providers a service can be hosted on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    Aws,
    Gcp,
    Vercel,
}

impl CloudProvider {
    /// Returns the lowercase string identifier for this provider
    pub fn as_str(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "aws",
            CloudProvider::Gcp => "gcp",
            CloudProvider::Vercel => "vercel",
        }
    }

    /// Returns the human-readable display name for this provider
    pub fn display_name(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "Amazon Web Services",
            CloudProvider::Gcp => "Google Cloud Platform",
            CloudProvider::Vercel => "Vercel",
        }
    }

    /// Returns all supported cloud providers
    pub fn all() -> &'static [CloudProvider] {
        &[CloudProvider::Aws, CloudProvider::Gcp, CloudProvider::Vercel]
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CloudProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aws" | "amazon" => Ok(CloudProvider::Aws),
            "gcp" | "google" | "google-cloud" => Ok(CloudProvider::Gcp),
            "vercel" => Ok(CloudProvider::Vercel),
            _ => Err(format!(
                "Unknown cloud provider: '{}'. Valid options: aws, gcp, vercel",
                s
            )),
        }
    }
}

/// What kind of service is being built
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceKind {
    Api,
    StaticWebsite,
    TaskRunner,
    WebsocketServer,
    App,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Api => "api",
            ServiceKind::StaticWebsite => "static-website",
            ServiceKind::TaskRunner => "task-runner",
            ServiceKind::WebsocketServer => "websocket-server",
            ServiceKind::App => "app",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ServiceKind::Api => "API",
            ServiceKind::StaticWebsite => "Static Website",
            ServiceKind::TaskRunner => "Task Runner",
            ServiceKind::WebsocketServer => "Websocket Server",
            ServiceKind::App => "App",
        }
    }

    pub fn all() -> &'static [ServiceKind] {
        &[
            ServiceKind::Api,
            ServiceKind::StaticWebsite,
            ServiceKind::TaskRunner,
            ServiceKind::WebsocketServer,
            ServiceKind::App,
        ]
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ServiceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ServiceKind::all()
            .iter()
            .copied()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown service kind: '{}'", s))
    }
}

/// Managed cloud service the pack deploys onto
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum HostingService {
    Lambda,
    Ec2,
    Ecs,
    S3,
    CodeBuild,
    CloudRun,
    CloudFunction,
    ServerlessFunctions,
}

impl HostingService {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostingService::Lambda => "lambda",
            HostingService::Ec2 => "ec2",
            HostingService::Ecs => "ecs",
            HostingService::S3 => "s3",
            HostingService::CodeBuild => "code-build",
            HostingService::CloudRun => "cloud-run",
            HostingService::CloudFunction => "cloud-function",
            HostingService::ServerlessFunctions => "serverless-functions",
        }
    }
}

impl fmt::Display for HostingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Source language a pack builds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Typescript,
    Javascript,
    Python,
    Swift,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::Typescript => "typescript",
            Language::Javascript => "javascript",
            Language::Python => "python",
            Language::Swift => "swift",
        };
        write!(f, "{}", name)
    }
}

// =============================================================================
// Build pack catalog
// =============================================================================

/// Declared UI type of a pack input
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    String,
    Number,
    Bool,
    /// List of environment variable pairs
    #[serde(alias = "list")]
    Envars,
}

/// One configuration input declared by a build pack
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PackInput {
    /// Key in the pack config
    pub name: String,
    /// Human-readable label
    #[serde(default)]
    pub label: Option<String>,
    /// Declared input type
    pub ui: InputKind,
    /// Default literal, always transported as a string
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
}

/// A published version of a build pack
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackVersion {
    pub version: String,
    #[serde(default)]
    pub inputs: Vec<PackInput>,
}

/// Catalog entry describing a reusable deployment template
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPack {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ServiceKind,
    pub provider: CloudProvider,
    pub service: HostingService,
    #[serde(default)]
    pub language: Option<Language>,
    /// Version string of the latest release
    pub latest: String,
    #[serde(default)]
    pub versions: Vec<PackVersion>,
}

impl BuildPack {
    /// Resolve the latest version into a reference the wizard can hold on to
    pub fn latest_ref(&self) -> Option<BuildPackRef> {
        let version = self.versions.iter().find(|v| v.version == self.latest)?;
        Some(BuildPackRef {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind,
            provider: self.provider,
            service: self.service,
            language: self.language,
            version: version.clone(),
        })
    }
}

/// A build pack pinned to one version
#[derive(Debug, Clone, PartialEq)]
pub struct BuildPackRef {
    pub id: String,
    pub name: String,
    pub kind: ServiceKind,
    pub provider: CloudProvider,
    pub service: HostingService,
    pub language: Option<Language>,
    pub version: PackVersion,
}

/// Catalog search filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackFilter {
    pub provider: Option<CloudProvider>,
    pub kind: Option<ServiceKind>,
    pub service: Option<HostingService>,
}

impl PackFilter {
    /// Query string for the search endpoint (empty when unfiltered)
    pub fn to_query(&self) -> String {
        let mut params = Vec::new();
        if let Some(p) = self.provider {
            params.push(format!("provider={}", p.as_str()));
        }
        if let Some(k) = self.kind {
            params.push(format!("type={}", k.as_str()));
        }
        if let Some(s) = self.service {
            params.push(format!("service={}", s.as_str()));
        }
        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }

    pub fn matches(&self, pack: &BuildPack) -> bool {
        self.provider.is_none_or(|p| p == pack.provider)
            && self.kind.is_none_or(|k| k == pack.kind)
            && self.service.is_none_or(|s| s == pack.service)
    }
}

/// Wire shape of the catalog search response
#[derive(Debug, Clone, Deserialize)]
pub struct PackSearchResponse {
    pub packs: Vec<BuildPack>,
}

// =============================================================================
// Pack configuration values
// =============================================================================

/// One environment variable in an `envars` input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub secret: bool,
}

/// A typed pack configuration value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Number(i64),
    EnvVars(Vec<EnvVar>),
    Text(String),
}

impl ConfigValue {
    /// Whether this value is of the kind an input declares
    pub fn matches_kind(&self, kind: InputKind) -> bool {
        matches!(
            (self, kind),
            (ConfigValue::Bool(_), InputKind::Bool)
                | (ConfigValue::Number(_), InputKind::Number)
                | (ConfigValue::EnvVars(_), InputKind::Envars)
                | (ConfigValue::Text(_), InputKind::String)
        )
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(b) => write!(f, "{}", b),
            ConfigValue::Number(n) => write!(f, "{}", n),
            ConfigValue::Text(s) => write!(f, "{}", s),
            ConfigValue::EnvVars(vars) => {
                let names: Vec<&str> = vars.iter().map(|v| v.name.as_str()).collect();
                write!(f, "[{}]", names.join(", "))
            }
        }
    }
}

/// Pack configuration keyed by input name
pub type PackConfig = BTreeMap<String, ConfigValue>;

// =============================================================================
// Platform snapshot
// =============================================================================

/// Key/value tag attached to a service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

/// A custom domain configured on a provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    pub id: String,
    pub domain: String,
    pub provider: CloudProvider,
}

/// An existing service, as far as config copying needs it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub id: String,
    pub name: String,
    pub pack_id: String,
    #[serde(default)]
    pub config: PackConfig,
}

/// The platform the wizard provisions into
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub has_connected_github_app: bool,
    #[serde(default)]
    pub domains: Vec<Domain>,
    #[serde(default)]
    pub services: Vec<ServiceSummary>,
}

impl Platform {
    /// Domains configured for one provider
    pub fn domains_for(&self, provider: CloudProvider) -> Vec<&Domain> {
        self.domains
            .iter()
            .filter(|d| d.provider == provider)
            .collect()
    }

    /// Existing services built from the given pack
    pub fn services_with_pack(&self, pack_id: &str) -> Vec<&ServiceSummary> {
        self.services
            .iter()
            .filter(|s| s.pack_id == pack_id)
            .collect()
    }
}

/// Whether the platform's GitHub App installation is complete
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkStatus {
    pub linked: bool,
}

// =============================================================================
// Connected account
// =============================================================================

/// A repository visible through the GitHub App installation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InstalledRepository {
    pub id: String,
    pub owner: String,
    pub repo: String,
    pub installation_id: String,
}

impl InstalledRepository {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstalledRepositoriesResponse {
    pub repositories: Vec<InstalledRepository>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BranchesResponse {
    pub branches: Vec<Branch>,
}

// =============================================================================
// Service creation
// =============================================================================

/// Request to create a service
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    pub platform_id: String,
    pub name: String,
    pub tags: Vec<Tag>,
    pub source: Option<SourceDescriptor>,
    pub pack_id: String,
    pub pack_config: PackConfig,
    pub domain_id: Option<String>,
    pub subdomain: Option<String>,
}

/// A created service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    pub platform_id: String,
    #[serde(default)]
    pub pack_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cloud_provider_from_str() {
        assert_eq!(CloudProvider::from_str("AWS").unwrap(), CloudProvider::Aws);
        assert_eq!(CloudProvider::from_str("google").unwrap(), CloudProvider::Gcp);
        assert!(CloudProvider::from_str("heroku").is_err());
    }

    #[test]
    fn test_build_pack_deserialization() {
        let json = r#"{
            "id": "pack-1",
            "name": "Lambda API",
            "type": "api",
            "provider": "aws",
            "service": "lambda",
            "language": "typescript",
            "latest": "0.2.0",
            "versions": [
                { "version": "0.1.0", "inputs": [] },
                { "version": "0.2.0", "inputs": [
                    { "name": "timeout", "ui": "number", "default": "3" },
                    { "name": "secrets", "ui": "envars" }
                ] }
            ]
        }"#;
        let pack: BuildPack = serde_json::from_str(json).unwrap();
        assert_eq!(pack.kind, ServiceKind::Api);
        assert_eq!(pack.service, HostingService::Lambda);

        let pack_ref = pack.latest_ref().unwrap();
        assert_eq!(pack_ref.version.version, "0.2.0");
        assert_eq!(pack_ref.version.inputs.len(), 2);
        assert_eq!(pack_ref.version.inputs[1].ui, InputKind::Envars);
        assert_eq!(pack_ref.version.inputs[1].default, None);
    }

    #[test]
    fn test_latest_ref_missing_version() {
        let pack = BuildPack {
            id: "p".into(),
            name: "p".into(),
            kind: ServiceKind::Api,
            provider: CloudProvider::Aws,
            service: HostingService::Lambda,
            language: None,
            latest: "9.9.9".into(),
            versions: vec![],
        };
        assert!(pack.latest_ref().is_none());
    }

    #[test]
    fn test_pack_filter_query() {
        assert_eq!(PackFilter::default().to_query(), "");
        let filter = PackFilter {
            provider: Some(CloudProvider::Aws),
            kind: Some(ServiceKind::StaticWebsite),
            service: None,
        };
        assert_eq!(filter.to_query(), "?provider=aws&type=static-website");
    }

    #[test]
    fn test_config_value_untagged() {
        let config: PackConfig =
            serde_json::from_str(r#"{"timeout": 3, "debug": true, "region": "us-east-1", "secrets": []}"#)
                .unwrap();
        assert_eq!(config["timeout"], ConfigValue::Number(3));
        assert_eq!(config["debug"], ConfigValue::Bool(true));
        assert_eq!(config["region"], ConfigValue::Text("us-east-1".into()));
        assert_eq!(config["secrets"], ConfigValue::EnvVars(vec![]));
        assert!(config["secrets"].matches_kind(InputKind::Envars));
        assert!(!config["timeout"].matches_kind(InputKind::String));
    }

    #[test]
    fn test_create_service_request_serialization() {
        let request = CreateServiceRequest {
            platform_id: "plat".into(),
            name: "auth".into(),
            tags: vec![Tag { name: "team".into(), value: "core".into() }],
            source: None,
            pack_id: "pack-1".into(),
            pack_config: PackConfig::new(),
            domain_id: None,
            subdomain: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["platformId"], "plat");
        assert_eq!(json["packId"], "pack-1");
        assert!(json["source"].is_null());
        assert!(json["domainId"].is_null());
    }
}
