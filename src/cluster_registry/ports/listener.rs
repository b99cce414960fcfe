//! Engagement listener port: the sole write path into a registry.

use super::ClusterHandle;
use crate::cluster_registry::domain::ClusterName;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Result type for engagement operations.
pub type EngagementResult<T> = Result<T, EngagementError>;

/// Callback surface through which a provider announces clusters.
///
/// An engagement announces that `name` is now reachable through `handle`,
/// either for the first time or with changed state. Implementations must be
/// callable concurrently from any number of provider tasks.
pub trait EngagementListener: Send + Sync {
    /// Records an engagement.
    ///
    /// `cancel` propagates the provider's cancellation scope; implementations
    /// must not block waiting on it.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError`] when the engagement cannot be recorded.
    fn engage(
        &self,
        cancel: &CancellationToken,
        name: ClusterName,
        handle: Arc<dyn ClusterHandle>,
    ) -> EngagementResult<()>;
}

/// Errors returned by engagement listeners.
#[derive(Debug, Clone, Error)]
pub enum EngagementError {
    /// The listener refused to record the cluster.
    #[error("engagement of cluster {name} rejected: {reason}")]
    Rejected {
        /// Cluster that was announced.
        name: ClusterName,
        /// Reason string.
        reason: String,
    },
}
