//! Validated cluster name type.

use super::ClusterRegistryDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name uniquely identifying one cluster within a registry.
///
/// Names are kept verbatim. Ordering is byte-wise lexicographic, which is the
/// order in which the registry enumerates clusters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClusterName(String);

impl ClusterName {
    /// Creates a cluster name.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterRegistryDomainError::EmptyClusterName`] when `value`
    /// is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, ClusterRegistryDomainError> {
        let name = value.into();
        if name.is_empty() {
            return Err(ClusterRegistryDomainError::EmptyClusterName);
        }
        Ok(Self(name))
    }

    /// Returns the cluster name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the name and returns the owned string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ClusterName {
    type Error = ClusterRegistryDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClusterName> for String {
    fn from(value: ClusterName) -> Self {
        value.0
    }
}

impl AsRef<str> for ClusterName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ClusterName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
