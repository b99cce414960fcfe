//! Error types for cluster registry domain validation.

use thiserror::Error;

/// Errors returned while constructing cluster registry domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClusterRegistryDomainError {
    /// The cluster name is empty.
    #[error("cluster name must not be empty")]
    EmptyClusterName,

    /// The connection host endpoint is empty after trimming.
    #[error("connection host must not be empty")]
    EmptyHost,
}
