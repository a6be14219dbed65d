//! Configuration management for newsdesk.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// This is loaded from `~/.config/newsdesk/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Content store settings
    pub database: DatabaseConfig,
    /// Broadcast item settings
    pub broadcast: BroadcastConfig,
    /// Log output settings
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, falling back to defaults if
    /// the file does not exist.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();

        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            let config: Self = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `NEWSDESK_DATABASE_PATH`: Override the SQLite database path
    /// - `NEWSDESK_BROADCAST_GENRE`: Override the broadcast genre value
    /// - `NEWSDESK_CONFLICT_RETRIES`: Override the version conflict retry count
    /// - `NEWSDESK_LOG_FILTER`: Override the default tracing filter
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply `NEWSDESK_*` environment overrides on top of the current values.
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("NEWSDESK_DATABASE_PATH") {
            tracing::debug!("Override database.path from env: {}", val);
            self.database.path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("NEWSDESK_BROADCAST_GENRE") {
            tracing::debug!("Override broadcast.genre_value from env: {}", val);
            self.broadcast.genre_value = val;
        }

        if let Ok(val) = std::env::var("NEWSDESK_CONFLICT_RETRIES") {
            if let Ok(retries) = val.parse() {
                self.broadcast.conflict_retries = retries;
                tracing::debug!("Override broadcast.conflict_retries from env: {}", retries);
            }
        }

        if let Ok(val) = std::env::var("NEWSDESK_LOG_FILTER") {
            self.logging.filter = val;
        }
    }

    /// Check values that would otherwise fail much later at runtime.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.broadcast.genre_value.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "broadcast.genre_value".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        if self.broadcast.genre_vocabulary_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "broadcast.genre_vocabulary_id".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                field: "database.max_connections".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to an explicit path.
    pub fn save_to(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let config_dir = path.parent().ok_or_else(|| ConfigError::InvalidValue {
            field: "config_path".to_string(),
            reason: "no parent directory".to_string(),
        })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/newsdesk/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("org", "newsdesk", "newsdesk").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Get the data directory path.
    ///
    /// Uses XDG base directories: `~/.local/share/newsdesk`
    pub fn data_dir() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("org", "newsdesk", "newsdesk").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.data_dir().to_path_buf())
    }
}

/// Content store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file (`:memory:` for an in-memory store)
    pub path: PathBuf,
    /// Maximum pooled connections
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("newsdesk.db"),
            max_connections: 5,
        }
    }
}

/// Broadcast item settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcastConfig {
    /// Genre value that marks an item as a broadcast item
    pub genre_value: String,
    /// Vocabulary that must list the broadcast genre
    pub genre_vocabulary_id: String,
    /// How many times a derived item is re-fetched after a version conflict
    pub conflict_retries: u32,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            genre_value: "Broadcast Script".to_string(),
            genre_vocabulary_id: "genre".to_string(),
            conflict_retries: 1,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive, overridden by `RUST_LOG`
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,newsdesk=debug".to_string(),
        }
    }
}
