//! Configuration management for contactlist.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "contactlist";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "contacts.db";

/// Upper bound for `storage.write_retries`.
const MAX_WRITE_RETRIES: u32 = 5;

/// Upper bound for `deletion.confirm_delay_ms`.
const MAX_CONFIRM_DELAY_MS: u64 = 10_000;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `CONTACTLIST_`, sections split on `__`)
/// 2. TOML config file at `~/.config/contactlist/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Deletion flow configuration.
    pub deletion: DeletionConfig,
    /// Dialing configuration.
    pub dial: DialConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/contactlist/contacts.db`
    pub database_path: Option<PathBuf>,
    /// How many times a write that failed to persist is retried.
    pub write_retries: u32,
}

/// Deletion flow configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeletionConfig {
    /// Delay between confirming a deletion and removing the contact,
    /// in milliseconds. 0 deletes immediately.
    pub confirm_delay_ms: u64,
}

/// Dialing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialConfig {
    /// Address prefix put in front of a contact's number.
    pub scheme: String,
    /// Hand call addresses to the host. When false, calls are only logged.
    pub enabled: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Will be resolved to default at runtime
            write_retries: 1,
        }
    }
}

impl Default for DeletionConfig {
    fn default() -> Self {
        Self {
            confirm_delay_ms: 300,
        }
    }
}

impl Default for DialConfig {
    fn default() -> Self {
        Self {
            scheme: crate::dial::DEFAULT_SCHEME.to_string(),
            enabled: true,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("CONTACTLIST_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.storage.write_retries > MAX_WRITE_RETRIES {
            return Err(Error::ConfigValidation {
                message: format!(
                    "write_retries ({}) cannot be greater than {MAX_WRITE_RETRIES}",
                    self.storage.write_retries
                ),
            });
        }

        if self.deletion.confirm_delay_ms > MAX_CONFIRM_DELAY_MS {
            return Err(Error::ConfigValidation {
                message: format!(
                    "confirm_delay_ms ({}) cannot be greater than {MAX_CONFIRM_DELAY_MS}",
                    self.deletion.confirm_delay_ms
                ),
            });
        }

        if !self.dial.scheme.contains(':') {
            return Err(Error::ConfigValidation {
                message: format!(
                    "dial scheme must name a URL scheme (e.g. \"tel://\"), got {:?}",
                    self.dial.scheme
                ),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the deletion delay as a Duration.
    #[must_use]
    pub fn confirm_delay(&self) -> Duration {
        Duration::from_millis(self.deletion.confirm_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert_eq!(config.storage.write_retries, 1);
        assert_eq!(config.deletion.confirm_delay_ms, 300);
        assert_eq!(config.dial.scheme, "tel://");
        assert!(config.dial.enabled);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_too_many_retries() {
        let mut config = Config::default();
        config.storage.write_retries = 50;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("write_retries"));
    }

    #[test]
    fn test_validate_delay_too_long() {
        let mut config = Config::default();
        config.deletion.confirm_delay_ms = 60_000;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("confirm_delay_ms"));
    }

    #[test]
    fn test_validate_zero_delay_allowed() {
        let mut config = Config::default();
        config.deletion.confirm_delay_ms = 0;

        assert!(config.validate().is_ok());
        assert_eq!(config.confirm_delay(), Duration::ZERO);
    }

    #[test]
    fn test_validate_bad_scheme() {
        let mut config = Config::default();
        config.dial.scheme = "tel".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("dial scheme"));
    }

    #[test]
    fn test_validate_alternate_scheme() {
        let mut config = Config::default();
        config.dial.scheme = "sip:".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.to_string_lossy().contains("contacts.db"));
        assert!(path.to_string_lossy().contains("contactlist"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_confirm_delay() {
        assert_eq!(Config::default().confirm_delay(), Duration::from_millis(300));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("contactlist"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_default_data_dir() {
        let path = Config::default_data_dir();
        assert!(path.to_string_lossy().contains("contactlist"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!(
            "contactlist_config_test_{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "[deletion]\nconfirm_delay_ms = 0\n\n[dial]\nscheme = \"sip:\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path.clone())).unwrap();
        assert_eq!(config.deletion.confirm_delay_ms, 0);
        assert_eq!(config.dial.scheme, "sip:");
        assert_eq!(config.storage.write_retries, 1);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let path = std::env::temp_dir().join(format!(
            "contactlist_config_invalid_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[storage]\nwrite_retries = 99\n").unwrap();

        let result = Config::load_from(Some(path.clone()));
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_config_clone() {
        let config = Config::default();
        assert_eq!(config, config.clone());
    }

    #[test]
    fn test_storage_config_deserialize() {
        let json = r#"{"write_retries": 3}"#;
        let storage: StorageConfig = serde_json::from_str(json).unwrap();
        assert_eq!(storage.write_retries, 3);
        assert!(storage.database_path.is_none());
    }

    #[test]
    fn test_dial_config_serialize() {
        let json = serde_json::to_string(&DialConfig::default()).unwrap();
        assert!(json.contains("tel://"));
    }
}
