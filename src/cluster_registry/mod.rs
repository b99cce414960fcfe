//! Registry of remote cluster connections discovered by a pluggable provider.
//!
//! A discovery provider announces clusters over time through the
//! engagement listener; the registry keeps the latest connection handle per
//! cluster name and serves two read operations to a transport layer: listing
//! the known cluster names and exporting one cluster's connection as a
//! portable credential document. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//! - Runtime settings in [`config`]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
