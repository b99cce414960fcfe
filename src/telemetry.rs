//! Log subscriber installation for binaries embedding the registry.

use crate::cluster_registry::config::{ConfigError, LoggingConfig};
use thiserror::Error;
use tracing_subscriber::FmtSubscriber;

/// Errors returned while installing the global subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The logging settings are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Installs a global `tracing` subscriber writing to stderr.
///
/// # Errors
///
/// Returns [`TelemetryError::Config`] for an unknown level and
/// [`TelemetryError::Install`] when a global subscriber already exists.
pub fn init_tracing(logging: &LoggingConfig) -> Result<(), TelemetryError> {
    let builder = FmtSubscriber::builder()
        .with_max_level(logging.level()?)
        .with_target(false)
        .with_writer(std::io::stderr);

    if logging.json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}
