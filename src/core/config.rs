//! Configuration management

use crate::hid::{FnMode, DEFAULT_SERVICE_CLASS};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// HID service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HidConfig {
    /// IOKit class of the service exposing `HIDFKeyMode`
    #[serde(default = "default_service_class")]
    pub service_class: String,
}

fn default_service_class() -> String {
    DEFAULT_SERVICE_CLASS.to_string()
}

impl Default for HidConfig {
    fn default() -> Self {
        Self {
            service_class: default_service_class(),
        }
    }
}

/// Behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorConfig {
    /// Mode set by `fkey-mode apply`
    #[serde(default = "default_mode")]
    pub default_mode: FnMode,
}

fn default_mode() -> FnMode {
    FnMode::Other
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            default_mode: default_mode(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HID service configuration
    #[serde(default)]
    pub hid: HidConfig,
    /// Behavior configuration
    #[serde(default)]
    pub behavior: BehaviorConfig,
    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `config_path`, defaults if it does not exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to `config_path`
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create parent directories if needed
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "fkeymode", "FKeyMode")
            .context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Get the default configuration embedded in the binary
    pub fn default_config_str() -> &'static str {
        include_str!("../../config/default.toml")
    }
}
