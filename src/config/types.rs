use crate::github::client::GITHUB_API_URL;
use crate::platform::api::client::{PLATFORM_API_URL_DEV, PLATFORM_API_URL_PROD};
use crate::source::ResolverSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable that switches the default API URL to the development server
pub const ENV_VAR: &str = "PROVISION_ENV";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub wizard: WizardConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// API endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Platform API URL; falls back to the environment default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default = "default_github_url")]
    pub github_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: None,
            github_url: default_github_url(),
        }
    }
}

impl ApiConfig {
    pub fn platform_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }
        match std::env::var(ENV_VAR).as_deref() {
            Ok("development") => PLATFORM_API_URL_DEV.to_string(),
            _ => PLATFORM_API_URL_PROD.to_string(),
        }
    }
}

fn default_github_url() -> String {
    GITHUB_API_URL.to_string()
}

/// Timing of the source step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardConfig {
    /// Quiet period before a pasted repository link is looked up
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Interval between GitHub App installation checks
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_installation_url")]
    pub installation_url: String,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            installation_url: default_installation_url(),
        }
    }
}

impl WizardConfig {
    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            debounce: Duration::from_millis(self.debounce_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
            installation_url: self.installation_url.clone(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    600
}

fn default_poll_interval_ms() -> u64 {
    800
}

fn default_installation_url() -> String {
    ResolverSettings::default().installation_url
}

/// Stored session credentials
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Expiry as Unix seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.wizard.debounce_ms, 600);
        assert_eq!(config.wizard.poll_interval_ms, 800);
        assert_eq!(config.api.github_url, "https://api.github.com");
        assert!(config.auth.access_token.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let config: Config = toml::from_str(
            r#"
            [api]
            url = "http://localhost:9000"

            [wizard]
            poll_interval_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.api.platform_url(), "http://localhost:9000");
        let settings = config.wizard.resolver_settings();
        assert_eq!(settings.poll_interval, Duration::from_millis(250));
        assert_eq!(settings.debounce, Duration::from_millis(600));
    }
}
