//! Cluster handle over a fixed connection configuration.

use crate::cluster_registry::{domain::ConnectionConfig, ports::ClusterHandle};

/// Handle whose connection configuration never changes.
///
/// Suitable for clusters provisioned out of band and for tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticClusterHandle {
    config: ConnectionConfig,
}

impl StaticClusterHandle {
    /// Creates a handle serving `config`.
    #[must_use]
    pub const fn new(config: ConnectionConfig) -> Self {
        Self { config }
    }
}

impl ClusterHandle for StaticClusterHandle {
    fn connection_config(&self) -> ConnectionConfig {
        self.config.clone()
    }
}
