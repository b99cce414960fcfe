//! Discovery provider port and its capability-typed wrapper.

use super::{EngagementError, EngagementListener};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Result type for discovery provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Background discovery loop of a runnable provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiscoveryProvider: Send + Sync {
    /// Runs discovery until `cancel` fires or the provider gives up.
    ///
    /// Discovered clusters are reported through `listener`. Returning
    /// `Ok(())` means the loop finished normally, typically after
    /// cancellation.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when discovery cannot start or terminates
    /// abnormally.
    async fn start(
        &self,
        cancel: CancellationToken,
        listener: Arc<dyn EngagementListener>,
    ) -> ProviderResult<()>;
}

/// A provider together with the capabilities it offers.
///
/// Only runnable providers carry a discovery loop. A passive provider leaves
/// the registry to be populated out of band by the embedding application.
#[derive(Clone)]
pub enum ClusterProvider {
    /// Provider without a background discovery process.
    Passive,
    /// Provider with a background discovery process.
    Runnable(Arc<dyn DiscoveryProvider>),
}

impl ClusterProvider {
    /// Wraps a runnable provider.
    #[must_use]
    pub fn runnable(provider: impl DiscoveryProvider + 'static) -> Self {
        Self::Runnable(Arc::new(provider))
    }

    /// Returns whether the provider has a discovery loop to drive.
    #[must_use]
    pub const fn is_runnable(&self) -> bool {
        matches!(self, Self::Runnable(_))
    }
}

impl fmt::Debug for ClusterProvider {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passive => formatter.write_str("Passive"),
            Self::Runnable(_) => formatter.write_str("Runnable(..)"),
        }
    }
}

/// Errors returned by discovery providers.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Discovery could not be started.
    #[error("discovery provider failed to start: {0}")]
    Startup(String),

    /// A discovered cluster could not be engaged.
    #[error(transparent)]
    Engagement(#[from] EngagementError),

    /// Discovery panicked.
    #[error("discovery provider panicked: {0}")]
    Panicked(String),

    /// Generic discovery failure.
    #[error("discovery provider error: {0}")]
    Discovery(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProviderError {
    /// Wraps a provider-specific discovery failure.
    pub fn discovery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Discovery(Arc::new(err))
    }
}
