pub mod types;

use crate::error::{ConfigError, Result};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = ".provision-wizard.toml";

/// Get the global config file path (~/.provision-wizard.toml)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_FILE_NAME))
}

/// Get the local config file path (dir/.provision-wizard.toml)
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Read one config file. A missing file is `Ok(None)`.
pub fn load_config_from(path: &Path) -> Result<Option<types::Config>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    toml::from_str(&content)
        .map(Some)
        .map_err(|e| ConfigError::ParsingFailed(format!("{}: {}", path.display(), e)))
}

/// Load configuration from file or use defaults.
/// Checks an explicit file first, then the local config, then the global one.
/// Unreadable files are skipped with a warning.
pub fn load_config(explicit: Option<&Path>) -> Result<types::Config> {
    if let Some(path) = explicit {
        return Ok(load_config_from(path)?.unwrap_or_default());
    }

    let candidates = std::env::current_dir()
        .ok()
        .map(|dir| local_config_path(&dir))
        .into_iter()
        .chain(global_config_path());

    for path in candidates {
        match load_config_from(&path) {
            Ok(Some(config)) => {
                log::debug!("Loaded config from {}", path.display());
                return Ok(config);
            }
            Ok(None) => {}
            Err(e) => log::warn!("Ignoring config file: {}", e),
        }
    }

    Ok(types::Config::default())
}

/// Write configuration to a specific file
pub fn save_config_to(config: &types::Config, path: &Path) -> Result<()> {
    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::ParsingFailed(e.to_string()))?;
    fs::write(path, content)?;
    Ok(())
}

/// Save configuration to global config file
pub fn save_global_config(config: &types::Config) -> Result<()> {
    match global_config_path() {
        Some(path) => save_config_to(config, &path),
        None => Err(ConfigError::InvalidValue {
            key: "home".to_string(),
            message: "no home directory to store the config in".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempdir().unwrap();
        assert!(load_config_from(&dir.path().join("nope.toml")).unwrap().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = local_config_path(dir.path());

        let mut config = types::Config::default();
        config.wizard.debounce_ms = 300;
        config.auth.access_token = Some("tok".to_string());
        save_config_to(&config, &path).unwrap();

        let loaded = load_config(Some(&path)).unwrap();
        assert_eq!(loaded.wizard.debounce_ms, 300);
        assert_eq!(loaded.auth.access_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[wizard\ndebounce_ms = ").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::ParsingFailed(_))));
    }
}
