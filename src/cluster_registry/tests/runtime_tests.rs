//! Unit tests for the registry runtime lifecycle.

use super::{SteppingClock, handle, host_of, name};
use crate::cluster_registry::{
    adapters::memory::InMemoryDiscoveryProvider,
    config::ClusterRegistryConfig,
    domain::ClusterName,
    ports::ClusterProvider,
    services::{ClusterRegistry, ClusterRegistryRuntime, ProviderExit, ProviderStatus},
};
use mockable::Clock;
use rstest::{fixture, rstest};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const WAIT: Duration = Duration::from_secs(5);

#[fixture]
fn config() -> ClusterRegistryConfig {
    ClusterRegistryConfig {
        provider_name: "memory".to_owned(),
        ..ClusterRegistryConfig::default()
    }
}

async fn wait_for_engagement<C>(registry: &ClusterRegistry<C>, cluster: &ClusterName)
where
    C: Clock + Send + Sync,
{
    tokio::time::timeout(WAIT, async {
        while registry.get(cluster).is_none() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("announced cluster should be engaged");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn shutdown_cancels_discovery_and_keeps_clusters(config: ClusterRegistryConfig) {
    let provider = Arc::new(InMemoryDiscoveryProvider::new());
    let runtime = ClusterRegistryRuntime::start(
        &config,
        ClusterProvider::Runnable(provider.clone()),
        CancellationToken::new(),
    );
    assert_eq!(runtime.registry().label(), "memory");

    provider.announce(name("a"), handle("https://a"));
    wait_for_engagement(runtime.registry(), &name("a")).await;
    assert_eq!(
        runtime.driver().status(),
        ProviderStatus::Running { attempt: 1 }
    );

    let registry = Arc::clone(runtime.registry());
    let mut status = runtime.driver().subscribe();
    let exit = tokio::time::timeout(WAIT, runtime.shutdown())
        .await
        .expect("shutdown should finish in time")
        .expect("driver task should join");

    assert!(matches!(exit, ProviderExit::Cancelled));
    assert_eq!(*status.borrow_and_update(), ProviderStatus::Cancelled);
    let kept = registry.get(&name("a")).expect("cluster a should survive shutdown");
    assert_eq!(host_of(&kept), "https://a");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn shutdown_of_passive_runtime_reports_passive(config: ClusterRegistryConfig) {
    let runtime =
        ClusterRegistryRuntime::start(&config, ClusterProvider::Passive, CancellationToken::new());
    runtime.registry().engage(name("static"), handle("https://static"));

    let exit = runtime.shutdown().await.expect("passive driver should join");

    assert!(matches!(exit, ProviderExit::Passive));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn start_with_clock_stamps_engagements(config: ClusterRegistryConfig) {
    let clock = Arc::new(SteppingClock::new());
    let provider = Arc::new(InMemoryDiscoveryProvider::new());
    let runtime = ClusterRegistryRuntime::start_with_clock(
        &config,
        ClusterProvider::Runnable(provider.clone()),
        CancellationToken::new(),
        Arc::clone(&clock),
    );

    provider.announce(name("a"), handle("https://a"));
    wait_for_engagement(runtime.registry(), &name("a")).await;

    let entry = runtime
        .registry()
        .entry(&name("a"))
        .expect("entry should exist");
    assert_eq!(entry.engaged_at(), clock.reading(0));
    assert_eq!(entry.engagement_count(), 1);

    let listed = runtime.queries().list_clusters().cluster_names;
    assert_eq!(listed, vec!["a".to_owned()]);

    let exit = runtime.shutdown().await.expect("driver task should join");
    assert!(matches!(exit, ProviderExit::Cancelled));
}
