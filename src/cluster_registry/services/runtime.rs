//! Composition of a registry, its provider driver and the query service.

use super::{
    ClusterQueryService, ClusterRegistry, ProviderDriver, ProviderDriverError,
    ProviderDriverHandle, ProviderExit,
};
use crate::cluster_registry::{config::ClusterRegistryConfig, ports::ClusterProvider};
use mockable::{Clock, DefaultClock};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A registry bound to exactly one provider.
pub struct ClusterRegistryRuntime<C = DefaultClock>
where
    C: Clock + Send + Sync + 'static,
{
    registry: Arc<ClusterRegistry<C>>,
    driver: ProviderDriverHandle,
}

impl ClusterRegistryRuntime<DefaultClock> {
    /// Creates an empty registry and starts driving `provider`.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime with a runnable provider.
    #[must_use]
    pub fn start(
        config: &ClusterRegistryConfig,
        provider: ClusterProvider,
        cancel: CancellationToken,
    ) -> Self {
        Self::start_with_clock(config, provider, cancel, Arc::new(DefaultClock))
    }
}

impl<C> ClusterRegistryRuntime<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Creates an empty registry stamped by `clock` and starts driving
    /// `provider`.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime with a runnable provider.
    #[must_use]
    pub fn start_with_clock(
        config: &ClusterRegistryConfig,
        provider: ClusterProvider,
        cancel: CancellationToken,
        clock: Arc<C>,
    ) -> Self {
        let registry = Arc::new(ClusterRegistry::with_clock(
            config.provider_name.clone(),
            clock,
        ));
        tracing::info!(
            registry = %registry.label(),
            runnable = provider.is_runnable(),
            "cluster registry created"
        );
        let driver = ProviderDriver::spawn(
            provider,
            registry.clone(),
            config.restart.policy(),
            cancel,
        );
        Self { registry, driver }
    }

    /// Returns the registry, e.g. for out-of-band engagement.
    #[must_use]
    pub const fn registry(&self) -> &Arc<ClusterRegistry<C>> {
        &self.registry
    }

    /// Returns a query service over the registry.
    #[must_use]
    pub fn queries(&self) -> ClusterQueryService<C> {
        ClusterQueryService::new(Arc::clone(&self.registry))
    }

    /// Returns the provider driver handle.
    #[must_use]
    pub const fn driver(&self) -> &ProviderDriverHandle {
        &self.driver
    }

    /// Cancels discovery and waits for the driver to stop.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderDriverError`] when the driver task cannot be joined.
    pub async fn shutdown(self) -> Result<ProviderExit, ProviderDriverError> {
        self.driver.cancel();
        let exit = self.driver.join().await?;
        tracing::info!(registry = %self.registry.label(), ?exit, "cluster registry stopped");
        Ok(exit)
    }
}
