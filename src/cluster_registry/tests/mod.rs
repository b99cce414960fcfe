//! Unit tests for the cluster registry services.

mod runtime_tests;

use crate::cluster_registry::{
    adapters::StaticClusterHandle, domain::ClusterName, domain::ConnectionConfig,
    ports::ClusterHandle,
};
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

fn name(value: &str) -> ClusterName {
    ClusterName::new(value).expect("valid cluster name")
}

fn handle(host: &str) -> Arc<dyn ClusterHandle> {
    Arc::new(StaticClusterHandle::new(
        ConnectionConfig::new(host).expect("valid host"),
    ))
}

fn host_of(handle: &Arc<dyn ClusterHandle>) -> String {
    handle.connection_config().host().to_owned()
}

/// Clock whose every reading is one second after the previous one.
#[derive(Debug)]
struct SteppingClock {
    start: DateTime<Utc>,
    readings: AtomicI64,
}

impl SteppingClock {
    fn new() -> Self {
        Self {
            start: Utc
                .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
                .single()
                .expect("valid start time"),
            readings: AtomicI64::new(0),
        }
    }

    /// Returns the time of reading number `index`, counting from zero.
    fn reading(&self, index: i64) -> DateTime<Utc> {
        self.start + TimeDelta::seconds(index)
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.reading(self.readings.fetch_add(1, Ordering::SeqCst))
    }
}
