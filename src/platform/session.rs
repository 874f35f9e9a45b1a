//! Platform session state management
//!
//! Remembers which platform `prov-ctl` provisions into, across CLI sessions.
//! Stored in `~/.provision-wizard/session.json`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Selected platform
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PlatformSession {
    pub platform_id: Option<String>,
    /// Human-readable platform name
    pub platform_name: Option<String>,
    /// When the session was last updated
    pub last_updated: Option<DateTime<Utc>>,
}

impl PlatformSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_platform(platform_id: String, platform_name: String) -> Self {
        Self {
            platform_id: Some(platform_id),
            platform_name: Some(platform_name),
            last_updated: Some(Utc::now()),
        }
    }

    pub fn clear(&mut self) {
        self.platform_id = None;
        self.platform_name = None;
        self.last_updated = Some(Utc::now());
    }

    pub fn is_platform_selected(&self) -> bool {
        self.platform_id.is_some()
    }

    /// Location: `~/.provision-wizard/session.json`
    pub fn session_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".provision-wizard")
            .join("session.json")
    }

    pub fn load() -> io::Result<Self> {
        Self::load_from(&Self::session_path())
    }

    /// Returns Default if the file doesn't exist
    pub fn load_from(path: &Path) -> io::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn save(&self) -> io::Result<()> {
        self.save_to(&Self::session_path())
    }

    /// Creates the parent directory if needed
    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    /// "[name]", "[id]" or "[no platform selected]"
    pub fn display_context(&self) -> String {
        match (&self.platform_name, &self.platform_id) {
            (Some(name), _) => format!("[{}]", name),
            (None, Some(id)) => format!("[{}]", id),
            _ => "[no platform selected]".to_string(),
        }
    }
}
