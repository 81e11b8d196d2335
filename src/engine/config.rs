//! HMS Access Configuration Module
//! Handles loading and validating hms-access.config.json

use crate::engine::guards::{default_navigation, NavItem};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "hms-access.config.json";

/// Current config schema version
pub const CONFIG_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Invalid config format: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_navigation")]
    pub navigation: Vec<NavItem>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_filter() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            navigation: default_navigation(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    pub fn load(project_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = project_dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Err(ConfigError::NotFound(config_path));
        }
        let content = std::fs::read_to_string(&config_path)?;
        let config: Config = serde_json::from_str(&content)?;

        if config.version > CONFIG_VERSION {
            return Err(ConfigError::Invalid(format!(
                "config version {} is newer than supported {}",
                config.version, CONFIG_VERSION
            )));
        }
        if config.navigation.iter().any(|item| item.label.trim().is_empty()) {
            return Err(ConfigError::Invalid("navigation entry with empty label".to_string()));
        }

        Ok(config)
    }

    /// Load from `project_dir`, or fall back to defaults when no file exists
    pub fn load_or_default(project_dir: &Path) -> Result<Self, ConfigError> {
        match Self::load(project_dir) {
            Err(ConfigError::NotFound(path)) => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn save(&self, project_dir: &Path) -> Result<(), ConfigError> {
        let config_path = project_dir.join(CONFIG_FILE);
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rbac::Resource;

    #[test]
    fn test_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(Config::load(dir.path()), Err(ConfigError::NotFound(_))));
        assert_eq!(Config::load_or_default(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.navigation.truncate(3);
        config.logging.filter = "hms_access_lib=debug".to_string();
        config.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "navigation": [ { "label": "Rota", "route": "/rota", "resource": "scheduling" } ] }"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.logging.filter, "warn");
        assert_eq!(config.navigation, vec![NavItem::new("Rota", "/rota", Resource::Scheduling)]);
    }

    #[test]
    fn test_unknown_resource_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "navigation": [ { "label": "Stock", "route": "/stock", "resource": "inventory" } ] }"#,
        )
        .unwrap();
        assert!(matches!(Config::load(dir.path()), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_empty_label_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "navigation": [ { "label": " ", "route": "/lab", "resource": "lab" } ] }"#,
        )
        .unwrap();
        assert!(matches!(Config::load(dir.path()), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_newer_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), r#"{ "version": 99 }"#).unwrap();
        assert!(matches!(Config::load(dir.path()), Err(ConfigError::Invalid(_))));
    }
}
