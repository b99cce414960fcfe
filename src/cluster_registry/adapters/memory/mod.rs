//! In-memory adapters for cluster discovery.

mod provider;

pub use provider::InMemoryDiscoveryProvider;
