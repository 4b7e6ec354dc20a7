//! Configuration for where and how games are persisted.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Persistence settings for the `steadfast` binary.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// JSON file holding the snapshot.
    #[serde(default = "default_snapshot_path")]
    snapshot_path: PathBuf,

    /// Key prefix separating this game from others in the same file.
    #[serde(default = "default_scope")]
    scope: String,
}

#[instrument]
fn default_snapshot_path() -> PathBuf {
    PathBuf::from("tictactoe_state.json")
}

#[instrument]
fn default_scope() -> String {
    "tictactoe".to_string()
}

impl GameConfig {
    /// Creates a configuration.
    #[instrument(skip(snapshot_path, scope))]
    pub fn new(snapshot_path: PathBuf, scope: String) -> Self {
        Self {
            snapshot_path,
            scope,
        }
    }

    /// Loads configuration from TOML file. Missing fields take defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        if config.scope.is_empty() {
            return Err(ConfigError::new("scope must not be empty".to_string()));
        }

        info!(scope = %config.scope, snapshot_path = %config.snapshot_path.display(), "Config loaded successfully");
        Ok(config)
    }

    /// Replaces the snapshot path.
    pub fn with_snapshot_path(mut self, snapshot_path: PathBuf) -> Self {
        self.snapshot_path = snapshot_path;
        self
    }

    /// Replaces the scope.
    pub fn with_scope(mut self, scope: String) -> Self {
        self.scope = scope;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(default_snapshot_path(), default_scope())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
