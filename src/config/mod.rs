//! Configuration module for fsops
//!
//! Holds the defaults the `fsops` binary falls back to when a flag is not
//! given: which extensions discovery accepts, whether a failing root aborts
//! the whole discovery, and how long the watcher debounces.
//! Configuration is stored in the user's config directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::discovery::FailurePolicy;
use crate::watch::WatchOptions;

const DEFAULT_DEBOUNCE_MS: u64 = 500;

fn default_extensions() -> Vec<String> {
    vec!["js".to_string(), "ts".to_string()]
}

const fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FsOpsConfig {
    /// Extensions accepted by `find` when none are passed on the command line
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Abort discovery on the first unreadable root instead of skipping it
    #[serde(default)]
    pub strict: bool,

    /// Quiet period for the change watcher, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub watch_debounce_ms: u64,

    /// Suppress informational output by default
    #[serde(default)]
    pub quiet: bool,
}

impl Default for FsOpsConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            strict: false,
            watch_debounce_ms: DEFAULT_DEBOUNCE_MS,
            quiet: false,
        }
    }
}

impl FsOpsConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("fsops").join("config.toml"))
    }

    /// Load configuration from the default location, creating it if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit TOML file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing or cannot be parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be determined or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`, creating its directory if needed
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    #[must_use]
    pub const fn failure_policy(&self) -> FailurePolicy {
        if self.strict {
            FailurePolicy::Strict
        } else {
            FailurePolicy::Lenient
        }
    }

    #[must_use]
    pub const fn watch_options(&self) -> WatchOptions {
        WatchOptions::with_debounce(Duration::from_millis(self.watch_debounce_ms))
    }
}
