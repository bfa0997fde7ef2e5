//! Engine configuration parsing and validation.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::{AppError, Result};

/// Deadlines (milliseconds) for the blocking interactions with the engine.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TimeoutConfig {
    /// Deadline for the whole `uci` → `uciok` handshake.
    #[serde(default = "default_init_ms")]
    pub init_ms: u64,
    /// How long `quit` may take before the process is force-killed.
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
    /// Deadline for the `isready` → `readyok` resync after a timed-out search.
    #[serde(default = "default_sync_ms")]
    pub sync_ms: u64,
}

fn default_init_ms() -> u64 {
    500
}

fn default_shutdown_grace_ms() -> u64 {
    500
}

fn default_sync_ms() -> u64 {
    500
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            init_ms: default_init_ms(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
            sync_ms: default_sync_ms(),
        }
    }
}

impl TimeoutConfig {
    /// Handshake deadline.
    #[must_use]
    pub fn init(&self) -> Duration {
        Duration::from_millis(self.init_ms)
    }

    /// Grace period between `quit` and a force-kill.
    #[must_use]
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }

    /// Resync deadline.
    #[must_use]
    pub fn sync(&self) -> Duration {
        Duration::from_millis(self.sync_ms)
    }
}

/// Search defaults applied by the orchestrator.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SearchConfig {
    /// Movetime substituted when a request carries no stopping condition.
    #[serde(default = "default_movetime_ms")]
    pub default_movetime_ms: u64,
    /// Extra time granted past `movetime` before the search is declared late.
    #[serde(default = "default_deadline_slack_ms")]
    pub deadline_slack_ms: u64,
    /// Deadline for searches bounded only by depth, nodes, mate or clock.
    #[serde(default = "default_max_search_ms")]
    pub max_search_ms: u64,
}

fn default_movetime_ms() -> u64 {
    100
}

fn default_deadline_slack_ms() -> u64 {
    10
}

fn default_max_search_ms() -> u64 {
    10_000
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_movetime_ms: default_movetime_ms(),
            deadline_slack_ms: default_deadline_slack_ms(),
            max_search_ms: default_max_search_ms(),
        }
    }
}

/// Configuration for one engine handle, usually parsed from `engine.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    /// Engine executable.
    pub path: PathBuf,
    /// Arguments passed to the executable.
    #[serde(default)]
    pub args: Vec<String>,
    /// Mirror every sent and received protocol line to the `debug` log.
    #[serde(default)]
    pub log_protocol: bool,
    /// Handshake, shutdown and resync deadlines.
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    /// Search defaults.
    #[serde(default)]
    pub search: SearchConfig,
}

impl EngineConfig {
    /// Build a configuration with default timeouts for the given executable.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            args: Vec::new(),
            log_protocol: false,
            timeouts: TimeoutConfig::default(),
            search: SearchConfig::default(),
        }
    }

    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read, contains
    /// invalid TOML, or fails validation.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the handle relies on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(AppError::Config("path must not be empty".into()));
        }

        let timeouts = [
            ("timeouts.init_ms", self.timeouts.init_ms),
            ("timeouts.shutdown_grace_ms", self.timeouts.shutdown_grace_ms),
            ("timeouts.sync_ms", self.timeouts.sync_ms),
            ("search.default_movetime_ms", self.search.default_movetime_ms),
            ("search.max_search_ms", self.search.max_search_ms),
        ];
        if let Some((name, _)) = timeouts.iter().find(|(_, value)| *value == 0) {
            return Err(AppError::Config(format!("{name} must be greater than zero")));
        }

        Ok(())
    }
}
