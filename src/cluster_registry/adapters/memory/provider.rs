//! Channel-fed discovery provider.

use crate::cluster_registry::{
    domain::ClusterName,
    ports::{ClusterHandle, DiscoveryProvider, EngagementListener, ProviderResult},
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
struct Announcement {
    name: ClusterName,
    handle: Arc<dyn ClusterHandle>,
}

/// Runnable provider that engages whatever clusters are announced to it.
///
/// Announcements made before discovery starts are queued and engaged in
/// order once it does. The discovery loop returns `Ok(())` on cancellation.
#[derive(Debug)]
pub struct InMemoryDiscoveryProvider {
    sender: mpsc::UnboundedSender<Announcement>,
    receiver: Mutex<mpsc::UnboundedReceiver<Announcement>>,
}

impl InMemoryDiscoveryProvider {
    /// Creates a provider with no pending announcements.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Mutex::new(receiver),
        }
    }

    /// Queues a cluster for engagement.
    ///
    /// The provider owns both ends of its queue, so an announcement is
    /// never lost while the provider is alive.
    pub fn announce(&self, name: ClusterName, handle: Arc<dyn ClusterHandle>) {
        if self.sender.send(Announcement { name, handle }).is_err() {
            tracing::warn!("announcement dropped; discovery queue is closed");
        }
    }
}

impl Default for InMemoryDiscoveryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DiscoveryProvider for InMemoryDiscoveryProvider {
    async fn start(
        &self,
        cancel: CancellationToken,
        listener: Arc<dyn EngagementListener>,
    ) -> ProviderResult<()> {
        let mut receiver = self.receiver.lock().await;
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return Ok(()),
                announcement = receiver.recv() => {
                    let Some(Announcement { name, handle }) = announcement else {
                        return Ok(());
                    };
                    listener.engage(&cancel, name, handle)?;
                }
            }
        }
    }
}
