//! Credential storage and retrieval
//!
//! Stores the session token in the `[auth]` section of ~/.provision-wizard.toml

use crate::config::types::AuthConfig;
use crate::config::{global_config_path, load_config_from, save_global_config};
use crate::config::types::Config;
use anyhow::Result;
use std::time::{SystemTime, UNIX_EPOCH};

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Credentials only ever live in the global file
fn load_global() -> Config {
    global_config_path()
        .and_then(|path| load_config_from(&path).ok().flatten())
        .unwrap_or_default()
}

/// Save credentials to global config file
pub fn save_credentials(
    access_token: &str,
    user_email: Option<&str>,
    expires_in_secs: Option<u64>,
) -> Result<()> {
    let mut config = load_global();
    config.auth = AuthConfig {
        access_token: Some(access_token.to_string()),
        expires_at: expires_in_secs.map(|secs| now_secs() + secs),
        user_email: user_email.map(|s| s.to_string()),
    };
    save_global_config(&config)?;
    Ok(())
}

/// Status of stored credentials at time `now` (Unix seconds)
pub fn status_of(auth: &AuthConfig, now: u64) -> AuthStatus {
    match &auth.access_token {
        None => AuthStatus::NotAuthenticated,
        Some(_) => match auth.expires_at {
            Some(expires_at) if now > expires_at => AuthStatus::Expired,
            expires_at => AuthStatus::Authenticated {
                email: auth.user_email.clone(),
                expires_at,
            },
        },
    }
}

/// Get authentication status including expiry info
pub fn get_auth_status() -> AuthStatus {
    status_of(&load_global().auth, now_secs())
}

/// Get the current access token if valid
pub fn get_access_token() -> Option<String> {
    let config = load_global();
    match status_of(&config.auth, now_secs()) {
        AuthStatus::Authenticated { .. } => config.auth.access_token,
        _ => None,
    }
}

/// Clear stored credentials (logout)
pub fn clear_credentials() -> Result<()> {
    let mut config = load_global();
    config.auth = AuthConfig::default();
    save_global_config(&config)?;
    Ok(())
}

/// Authentication status enum
#[derive(Debug, PartialEq, Eq)]
pub enum AuthStatus {
    NotAuthenticated,
    Expired,
    Authenticated {
        email: Option<String>,
        expires_at: Option<u64>,
    },
}
