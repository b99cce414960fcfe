//! Concurrency-safe map of engaged clusters.

use crate::cluster_registry::{
    domain::ClusterName,
    ports::{ClusterHandle, EngagementListener, EngagementResult},
};
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Snapshot of one registry entry.
#[derive(Debug, Clone)]
pub struct RegisteredCluster {
    handle: Arc<dyn ClusterHandle>,
    engaged_at: DateTime<Utc>,
    engagement_count: u64,
}

impl RegisteredCluster {
    /// Returns the most recently engaged handle.
    #[must_use]
    pub fn handle(&self) -> Arc<dyn ClusterHandle> {
        Arc::clone(&self.handle)
    }

    /// Returns when the handle was engaged.
    #[must_use]
    pub const fn engaged_at(&self) -> DateTime<Utc> {
        self.engaged_at
    }

    /// Returns how many times the name has been engaged.
    #[must_use]
    pub const fn engagement_count(&self) -> u64 {
        self.engagement_count
    }
}

/// In-memory registry mapping cluster names to connection handles.
///
/// Engagement takes the write side of a single lock and inserts one key;
/// lookups and enumeration take the read side. Nothing here performs I/O or
/// calls back into the provider. Entries are never evicted.
pub struct ClusterRegistry<C = DefaultClock>
where
    C: Clock + Send + Sync,
{
    label: String,
    clusters: RwLock<BTreeMap<ClusterName, RegisteredCluster>>,
    clock: Arc<C>,
}

impl ClusterRegistry<DefaultClock> {
    /// Creates an empty registry using the system clock.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_clock(label, Arc::new(DefaultClock))
    }
}

impl<C> ClusterRegistry<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty registry stamping engagements with `clock`.
    #[must_use]
    pub fn with_clock(label: impl Into<String>, clock: Arc<C>) -> Self {
        Self {
            label: label.into(),
            clusters: RwLock::new(BTreeMap::new()),
            clock,
        }
    }

    /// Returns the registry label, usually the provider name.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Inserts or replaces the handle for `name`.
    ///
    /// The last engagement for a name wins.
    pub fn engage(&self, name: ClusterName, handle: Arc<dyn ClusterHandle>) {
        let engagement_count = {
            let mut clusters = self.clusters.write();
            // Stamped under the lock so timestamps follow engagement order.
            let engaged_at = self.clock.utc();
            let engagement_count = clusters
                .get(&name)
                .map_or(1, |previous| previous.engagement_count.saturating_add(1));
            clusters.insert(
                name.clone(),
                RegisteredCluster {
                    handle,
                    engaged_at,
                    engagement_count,
                },
            );
            engagement_count
        };

        tracing::debug!(
            registry = %self.label,
            cluster = %name,
            engagement_count,
            "cluster engaged"
        );
    }

    /// Returns every known cluster name in lexicographic order.
    #[must_use]
    pub fn list_names(&self) -> Vec<ClusterName> {
        self.clusters.read().keys().cloned().collect()
    }

    /// Returns the handle currently associated with `name`.
    #[must_use]
    pub fn get(&self, name: &ClusterName) -> Option<Arc<dyn ClusterHandle>> {
        self.clusters.read().get(name).map(RegisteredCluster::handle)
    }

    /// Returns the full entry currently associated with `name`.
    #[must_use]
    pub fn entry(&self, name: &ClusterName) -> Option<RegisteredCluster> {
        self.clusters.read().get(name).cloned()
    }

    /// Returns the number of known clusters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clusters.read().len()
    }

    /// Returns whether no cluster has been engaged yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clusters.read().is_empty()
    }
}

impl<C> EngagementListener for ClusterRegistry<C>
where
    C: Clock + Send + Sync,
{
    fn engage(
        &self,
        _cancel: &CancellationToken,
        name: ClusterName,
        handle: Arc<dyn ClusterHandle>,
    ) -> EngagementResult<()> {
        Self::engage(self, name, handle);
        Ok(())
    }
}

impl<C> fmt::Debug for ClusterRegistry<C>
where
    C: Clock + Send + Sync,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ClusterRegistry")
            .field("label", &self.label)
            .field("clusters", &self.list_names())
            .finish_non_exhaustive()
    }
}
