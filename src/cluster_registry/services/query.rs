//! Read-only query operations exposed to a transport layer.

use super::ClusterRegistry;
use crate::cluster_registry::domain::{ClusterName, CredentialDocument};
use mockable::{Clock, DefaultClock};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Request payload for exporting one cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetClusterRequest {
    /// Name of the cluster to export.
    pub cluster_name: String,
}

impl GetClusterRequest {
    /// Creates a request for `cluster_name`.
    #[must_use]
    pub fn new(cluster_name: impl Into<String>) -> Self {
        Self {
            cluster_name: cluster_name.into(),
        }
    }
}

/// Response payload listing the known clusters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListClustersOutput {
    /// Cluster names in lexicographic order.
    pub cluster_names: Vec<String>,
}

/// Response payload carrying one cluster's exported credential document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedClusterConfig {
    /// Name of the exported cluster.
    pub cluster_name: String,
    /// Document encoded as compact JSON.
    pub compact_config: String,
    /// Document encoded as indented JSON.
    pub indented_config: String,
}

/// Errors returned by query operations.
#[derive(Debug, Error)]
pub enum ClusterQueryError {
    /// No cluster with the requested name has been engaged.
    #[error("cluster {0} not found")]
    NotFound(String),

    /// The credential document could not be encoded.
    #[error("failed to encode credentials for cluster {cluster_name}: {source}")]
    Serialization {
        /// Cluster being exported.
        cluster_name: ClusterName,
        /// Encoder failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for query operations.
pub type ClusterQueryResult<T> = Result<T, ClusterQueryError>;

/// Query operations over a [`ClusterRegistry`].
pub struct ClusterQueryService<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    registry: Arc<ClusterRegistry<C>>,
}

impl<C> Clone for ClusterQueryService<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<C> ClusterQueryService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a query service reading `registry`.
    #[must_use]
    pub const fn new(registry: Arc<ClusterRegistry<C>>) -> Self {
        Self { registry }
    }

    /// Lists every known cluster name in lexicographic order.
    #[must_use]
    pub fn list_clusters(&self) -> ListClustersOutput {
        ListClustersOutput {
            cluster_names: self
                .registry
                .list_names()
                .into_iter()
                .map(ClusterName::into_inner)
                .collect(),
        }
    }

    /// Exports the credential document of one cluster.
    ///
    /// The registry lock covers only the lookup; the handle is asked for its
    /// configuration and the document is encoded afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterQueryError::NotFound`] when the cluster is unknown,
    /// including the empty name, which can never be engaged, or
    /// [`ClusterQueryError::Serialization`] when encoding fails.
    pub fn get_cluster(
        &self,
        request: &GetClusterRequest,
    ) -> ClusterQueryResult<ExportedClusterConfig> {
        let not_found = || ClusterQueryError::NotFound(request.cluster_name.clone());
        let cluster_name =
            ClusterName::new(request.cluster_name.as_str()).map_err(|_| not_found())?;
        let handle = self.registry.get(&cluster_name).ok_or_else(not_found)?;

        let document = CredentialDocument::from_connection_config(&handle.connection_config());
        let encode_error = |source| ClusterQueryError::Serialization {
            cluster_name: cluster_name.clone(),
            source,
        };
        let compact_config = serde_json::to_string(&document).map_err(encode_error)?;
        let indented_config = serde_json::to_string_pretty(&document).map_err(encode_error)?;

        Ok(ExportedClusterConfig {
            cluster_name: cluster_name.into_inner(),
            compact_config,
            indented_config,
        })
    }
}
