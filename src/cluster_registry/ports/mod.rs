//! Port contracts between the cluster registry and discovery providers.

mod handle;
mod listener;
mod provider;

pub use handle::ClusterHandle;
pub use listener::{EngagementError, EngagementListener, EngagementResult};
pub use provider::{ClusterProvider, DiscoveryProvider, ProviderError, ProviderResult};

#[cfg(test)]
pub(crate) use provider::MockDiscoveryProvider;
