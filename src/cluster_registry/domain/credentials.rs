//! Portable credential document and its derivation from a connection.
//!
//! The document follows the kubeconfig layout: named cluster, context and
//! user (auth-info) maps plus a designated current context. An export always
//! describes exactly one cluster, so every map holds a single entry named
//! [`DEFAULT_ENTRY_NAME`] and the current context points at it.

use super::ConnectionConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name shared by the cluster, context and auth-info entries of an export.
pub const DEFAULT_ENTRY_NAME: &str = "default";

const DOCUMENT_KIND: &str = "Config";
const DOCUMENT_API_VERSION: &str = "v1";
const DEFAULT_NAMESPACE: &str = "default";

/// Cluster endpoint section of a credential document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClusterEntry {
    /// Server URL.
    pub server: String,
    /// Certificate-authority material, base64-encoded on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64_bytes")]
    pub certificate_authority_data: Option<Vec<u8>>,
}

/// Context section binding a cluster, a namespace and an auth-info entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    /// Referenced cluster entry name.
    pub cluster: String,
    /// Default namespace for the context.
    pub namespace: String,
    /// Referenced auth-info entry name.
    #[serde(rename = "user")]
    pub auth_info: String,
}

/// Authentication section of a credential document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AuthInfoEntry {
    /// Bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Basic-auth username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Basic-auth password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Client certificate material, base64-encoded on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64_bytes")]
    pub client_certificate_data: Option<Vec<u8>>,
    /// Client key material, base64-encoded on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64_bytes")]
    pub client_key_data: Option<Vec<u8>>,
}

/// Exportable single-cluster credential document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialDocument {
    kind: String,
    #[serde(rename = "apiVersion")]
    api_version: String,
    clusters: BTreeMap<String, ClusterEntry>,
    contexts: BTreeMap<String, ContextEntry>,
    #[serde(rename = "users")]
    auth_infos: BTreeMap<String, AuthInfoEntry>,
    #[serde(rename = "current-context")]
    current_context: String,
}

impl CredentialDocument {
    /// Derives the credential document for one connection.
    ///
    /// The mapping is pure: the same configuration always yields an equal
    /// document.
    #[must_use]
    pub fn from_connection_config(config: &ConnectionConfig) -> Self {
        let cluster = ClusterEntry {
            server: config.host().to_owned(),
            certificate_authority_data: config.certificate_authority().map(<[u8]>::to_vec),
        };
        let context = ContextEntry {
            cluster: DEFAULT_ENTRY_NAME.to_owned(),
            namespace: DEFAULT_NAMESPACE.to_owned(),
            auth_info: DEFAULT_ENTRY_NAME.to_owned(),
        };
        let auth_info = AuthInfoEntry {
            token: config.bearer_token().map(str::to_owned),
            username: config.username().map(str::to_owned),
            password: config.password().map(str::to_owned),
            client_certificate_data: config.client_certificate().map(<[u8]>::to_vec),
            client_key_data: config.client_key().map(<[u8]>::to_vec),
        };

        Self {
            kind: DOCUMENT_KIND.to_owned(),
            api_version: DOCUMENT_API_VERSION.to_owned(),
            clusters: BTreeMap::from([(DEFAULT_ENTRY_NAME.to_owned(), cluster)]),
            contexts: BTreeMap::from([(DEFAULT_ENTRY_NAME.to_owned(), context)]),
            auth_infos: BTreeMap::from([(DEFAULT_ENTRY_NAME.to_owned(), auth_info)]),
            current_context: DEFAULT_ENTRY_NAME.to_owned(),
        }
    }

    /// Returns the document kind tag.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the document version tag.
    #[must_use]
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Returns the named cluster entries.
    #[must_use]
    pub const fn clusters(&self) -> &BTreeMap<String, ClusterEntry> {
        &self.clusters
    }

    /// Returns the named context entries.
    #[must_use]
    pub const fn contexts(&self) -> &BTreeMap<String, ContextEntry> {
        &self.contexts
    }

    /// Returns the named auth-info entries.
    #[must_use]
    pub const fn auth_infos(&self) -> &BTreeMap<String, AuthInfoEntry> {
        &self.auth_infos
    }

    /// Returns the current context name.
    #[must_use]
    pub fn current_context(&self) -> &str {
        &self.current_context
    }

    /// Returns the cluster entry named [`DEFAULT_ENTRY_NAME`].
    #[must_use]
    pub fn default_cluster(&self) -> Option<&ClusterEntry> {
        self.clusters.get(DEFAULT_ENTRY_NAME)
    }

    /// Returns the context entry named [`DEFAULT_ENTRY_NAME`].
    #[must_use]
    pub fn default_context(&self) -> Option<&ContextEntry> {
        self.contexts.get(DEFAULT_ENTRY_NAME)
    }

    /// Returns the auth-info entry named [`DEFAULT_ENTRY_NAME`].
    #[must_use]
    pub fn default_auth_info(&self) -> Option<&AuthInfoEntry> {
        self.auth_infos.get(DEFAULT_ENTRY_NAME)
    }
}

impl From<&ConnectionConfig> for CredentialDocument {
    fn from(config: &ConnectionConfig) -> Self {
        Self::from_connection_config(config)
    }
}

mod base64_bytes {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer};

    #[expect(
        clippy::ref_option,
        reason = "serde `with` helpers receive the field by reference"
    )]
    pub fn serialize<S>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|encoded| STANDARD.decode(encoded).map_err(serde::de::Error::custom))
            .transpose()
    }
}
