//! Application services for cluster tracking, discovery and queries.

mod driver;
mod query;
mod registry;
mod runtime;

pub use driver::{
    ProviderDriver, ProviderDriverError, ProviderDriverHandle, ProviderExit,
    ProviderRestartPolicy, ProviderStatus,
};
pub use query::{
    ClusterQueryError, ClusterQueryResult, ClusterQueryService, ExportedClusterConfig,
    GetClusterRequest, ListClustersOutput,
};
pub use registry::{ClusterRegistry, RegisteredCluster};
pub use runtime::ClusterRegistryRuntime;
