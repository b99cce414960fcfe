//! Fleetdeck: a registry of remote cluster connections.
//!
//! This crate tracks a dynamically changing set of cluster connection handles
//! announced by a pluggable discovery provider, and exports single-cluster
//! credential documents on request.
//!
//! # Architecture
//!
//! Fleetdeck follows hexagonal architecture principles:
//!
//! - **Domain**: Pure value types with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for providers and connection handles
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`cluster_registry`]: Cluster tracking, provider supervision and queries
//! - [`telemetry`]: Log subscriber installation

pub mod cluster_registry;
pub mod telemetry;
