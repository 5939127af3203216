//! Configuration management for Phototag.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Every section is optional in the file.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Phototag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// HTTP bind settings
    pub server: ServerConfig,

    /// Strategy selection
    pub model: ModelConfig,

    /// Closed-set classifier settings
    pub classifier: ClassifierConfig,

    /// Zero-shot settings
    pub zero_shot: ZeroShotConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.phototag.phototag/config.toml
    /// - Linux: ~/.config/phototag/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\phototag\config\config.toml
    ///
    /// Falls back to ~/.phototag/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "phototag", "phototag")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".phototag").join("config.toml")
            })
    }

    /// Get the resolved model directory path (with ~ expansion).
    pub fn model_dir(&self) -> PathBuf {
        expand(&self.general.model_dir)
    }

    /// Folder holding the closed-set classifier.
    pub fn classifier_dir(&self) -> PathBuf {
        self.model_dir().join(&self.classifier.model)
    }

    /// Folder holding the zero-shot encoders and tokenizer.
    pub fn zero_shot_dir(&self) -> PathBuf {
        self.model_dir().join(&self.zero_shot.model)
    }

    /// Resolved label file for the closed-set classifier.
    ///
    /// Relative paths are looked up inside the classifier folder.
    pub fn labels_path(&self) -> PathBuf {
        let path = expand(&self.classifier.labels_file);
        if path.is_absolute() {
            path
        } else {
            self.classifier_dir().join(path)
        }
    }

    /// Resolved category override file for the zero-shot strategy, if set.
    pub fn categories_path(&self) -> Option<PathBuf> {
        self.zero_shot.categories_file.as_deref().map(expand)
    }

    /// Socket address string the server binds.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn expand(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&path_str).into_owned())
}
