//! Config module - Manages sitepass configuration (sitepass.toml).
//!
//! Configuration file contains:
//! - Database path
//! - Salt file path
//!
//! Environment variables (and a `.env` file in the working directory)
//! override file values. The master password is never stored here.

use crate::vault::StoreConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Env var overriding the database path
pub const ENV_DB_PATH: &str = "SITEPASS_DB_PATH";

/// Env var overriding the salt file path
pub const ENV_SALT_PATH: &str = "SITEPASS_SALT_PATH";

/// Env var holding the master password (skips the prompt)
pub const ENV_MASTER_PASSWORD: &str = "MASTER_PASSWORD";

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// SQLite database file
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Main sitepass configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Config version (for future migrations)
    #[serde(default = "default_version")]
    pub version: u32,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Salt file used for key derivation
    #[serde(default = "default_salt_path")]
    pub salt_path: PathBuf,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            database: DatabaseConfig::default(),
            salt_path: default_salt_path(),
        }
    }
}

/// Get default data directory (~/.local/share/sitepass/).
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("sitepass"))
        .unwrap_or_else(|| PathBuf::from("./sitepass-data"))
}

fn default_db_path() -> PathBuf {
    default_data_dir().join("passwords.db")
}

fn default_salt_path() -> PathBuf {
    default_data_dir().join("salt")
}

/// Get default config directory (~/.config/sitepass/).
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("sitepass"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get default config file path.
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("sitepass.toml")
}

/// Load variables from a dotenv file into the process environment.
/// A missing file is not an error; an unreadable or malformed one is.
/// Variables already set in the environment are left untouched.
pub fn load_env_file(path: &Path) -> Result<()> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Cannot load .env: {}", path.display())),
    }
}

impl Config {
    /// Create new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Cannot parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load config from `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config and apply environment overrides.
    /// Reads `.env` from the working directory first if present.
    pub fn resolve(path: &Path) -> Result<Self> {
        load_env_file(Path::new(".env"))?;

        let mut config = Self::load_or_default(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override file values with environment values.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DB_PATH).filter(|v| !v.is_empty()) {
            self.database.path = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_SALT_PATH).filter(|v| !v.is_empty()) {
            self.salt_path = PathBuf::from(path);
        }
    }

    /// Save config to file.
    pub fn save(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).with_context(|| "Cannot serialize config to TOML")?;

        std::fs::write(path, content)
            .with_context(|| format!("Cannot write config file: {}", path.display()))?;

        // Restrict file permissions on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// Storage settings for [`crate::vault::CredentialStore`].
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.database.path.clone())
    }
}
