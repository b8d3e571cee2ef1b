//! Settings file management.
//!
//! `~/.denv/config.toml` layers user preferences over built-in defaults:
//! a missing file or a missing field just means the default applies.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::constants::{CONFIG_FILE, DEFAULT_ENV_FILE, GLOBAL_VAULT_SUBDIR, VAULT_DIR};
use crate::error::{DenvError, Result};

/// User settings loaded from the home config directory.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Custom vault path, consulted between local and global resolution.
    pub vault_path: Option<PathBuf>,
    /// Env document name used by grant/revoke when no `--file` is given.
    pub env_file: Option<String>,
    /// Whether grant backs up the env document before rewriting it.
    pub backup_on_grant: Option<bool>,
}

impl Settings {
    /// Load settings from the default location; absent file == defaults.
    pub fn load() -> Result<Self> {
        match config_path() {
            Ok(path) => Self::load_from(&path),
            // No home directory: fall back to defaults.
            Err(_) => Ok(Self::default()),
        }
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&contents)?;
        debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Persist settings to the default location.
    pub fn save(&self) -> Result<()> {
        let path = config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;
        Ok(())
    }

    /// Effective env document name.
    pub fn env_file(&self) -> &str {
        self.env_file.as_deref().unwrap_or(DEFAULT_ENV_FILE)
    }

    /// Effective backup-on-grant default.
    pub fn backup_on_grant(&self) -> bool {
        self.backup_on_grant.unwrap_or(true)
    }
}

/// The home config directory (`~/.denv`).
pub fn home_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DenvError::Config("unable to determine home directory".to_string()))?;
    Ok(home.join(VAULT_DIR))
}

/// Path of the settings file.
pub fn config_path() -> Result<PathBuf> {
    Ok(home_config_dir()?.join(CONFIG_FILE))
}

/// Directory of the shared global vault (`~/.denv/vault`).
pub fn global_vault_dir() -> Result<PathBuf> {
    Ok(home_config_dir()?.join(GLOBAL_VAULT_SUBDIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load_from(&tmp.path().join("config.toml")).unwrap();

        assert!(settings.vault_path.is_none());
        assert_eq!(settings.env_file(), ".env");
        assert!(settings.backup_on_grant());
    }

    #[test]
    fn test_partial_file_layers_over_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "env_file = \".env.local\"\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.env_file(), ".env.local");
        assert!(settings.backup_on_grant());
        assert!(settings.vault_path.is_none());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "env_file = [not toml").unwrap();

        assert!(Settings::load_from(&path).is_err());
    }
}
