//! Runtime settings for a cluster registry.
//!
//! Settings are read from a JSON document. A representative document is:
//!
//! ```json
//! {
//!   "provider_name": "kind",
//!   "restart": {
//!     "max_restarts": 5,
//!     "initial_backoff_ms": 500,
//!     "max_backoff_ms": 30000
//!   },
//!   "logging": {
//!     "level": "debug",
//!     "json": true
//!   }
//! }
//! ```
//!
//! Every field is optional.

use crate::cluster_registry::services::ProviderRestartPolicy;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::time::Duration;
use thiserror::Error;
use tracing::Level;

/// Errors returned while loading registry settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid settings JSON.
    #[error("failed to parse cluster registry config: {0}")]
    Parse(#[source] serde_json::Error),

    /// The logging level is not a known `tracing` level.
    #[error("unknown log level '{0}'")]
    InvalidLogLevel(String),
}

/// Top-level registry settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterRegistryConfig {
    /// Label of the provider feeding the registry.
    pub provider_name: String,
    /// Restart behaviour for a failing discovery loop.
    pub restart: RestartConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
}

impl Default for ClusterRegistryConfig {
    fn default() -> Self {
        Self {
            provider_name: "default".to_owned(),
            restart: RestartConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ClusterRegistryConfig {
    /// Parses settings from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the document is malformed or names an
    /// unknown log level.
    pub fn from_json_str(document: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(document).map_err(ConfigError::Parse)?;
        config.validate()
    }

    /// Parses settings from a JSON reader.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the document is malformed or names an
    /// unknown log level.
    pub fn from_reader(reader: impl Read) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_reader(reader).map_err(ConfigError::Parse)?;
        config.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        self.logging.level()?;
        Ok(self)
    }
}

/// Restart settings for the provider driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestartConfig {
    /// Restarts allowed after failures; zero disables restarting.
    pub max_restarts: u32,
    /// Delay before the first restart, in milliseconds.
    pub initial_backoff_ms: u64,
    /// Upper bound for the restart delay, in milliseconds.
    pub max_backoff_ms: u64,
}

impl Default for RestartConfig {
    fn default() -> Self {
        Self {
            max_restarts: 5,
            initial_backoff_ms: 500,
            max_backoff_ms: 30_000,
        }
    }
}

impl RestartConfig {
    /// Converts the settings into a driver restart policy.
    #[must_use]
    pub fn policy(&self) -> ProviderRestartPolicy {
        if self.max_restarts == 0 {
            return ProviderRestartPolicy::Never;
        }
        let initial_backoff = Duration::from_millis(self.initial_backoff_ms);
        ProviderRestartPolicy::OnFailure {
            max_restarts: self.max_restarts,
            initial_backoff,
            max_backoff: Duration::from_millis(self.max_backoff_ms).max(initial_backoff),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Maximum level, e.g. `info` or `debug`.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Returns the parsed maximum level.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLogLevel`] for unknown level names.
    pub fn level(&self) -> Result<Level, ConfigError> {
        self.level
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidLogLevel(self.level.clone()))
    }
}
