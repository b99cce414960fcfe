//! Domain model for cluster tracking and credential export.
//!
//! The cluster registry domain models cluster identity, the connection
//! configuration a provider hands out for an established connection, and the
//! portable credential document derived from it. Locking, discovery and
//! transport concerns remain outside this boundary.

mod connection;
mod credentials;
mod error;
mod name;

pub use connection::ConnectionConfig;
pub use credentials::{
    AuthInfoEntry, ClusterEntry, ContextEntry, CredentialDocument, DEFAULT_ENTRY_NAME,
};
pub use error::ClusterRegistryDomainError;
pub use name::ClusterName;
