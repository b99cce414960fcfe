//! Connection handle port.

use crate::cluster_registry::domain::ConnectionConfig;
use std::fmt;

/// Opaque reference to an established cluster connection.
///
/// Providers own the handle's internals. The registry only stores handles by
/// name and asks them for their current configuration when a cluster is
/// exported.
pub trait ClusterHandle: fmt::Debug + Send + Sync {
    /// Returns the connection configuration as of now.
    fn connection_config(&self) -> ConnectionConfig;
}
