//! Connection configuration value object.

use super::ClusterRegistryDomainError;
use std::fmt;

/// Settings needed to reach an established cluster connection.
///
/// Only the host endpoint is mandatory. Authentication and TLS material is
/// optional and carried as raw bytes where the upstream format is binary.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    host: String,
    bearer_token: Option<String>,
    username: Option<String>,
    password: Option<String>,
    client_certificate: Option<Vec<u8>>,
    client_key: Option<Vec<u8>>,
    certificate_authority: Option<Vec<u8>>,
}

impl ConnectionConfig {
    /// Creates a configuration for the given host endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterRegistryDomainError::EmptyHost`] when `host` is empty
    /// after trimming.
    pub fn new(host: impl Into<String>) -> Result<Self, ClusterRegistryDomainError> {
        let normalized_host = host.into().trim().to_owned();
        if normalized_host.is_empty() {
            return Err(ClusterRegistryDomainError::EmptyHost);
        }

        Ok(Self {
            host: normalized_host,
            bearer_token: None,
            username: None,
            password: None,
            client_certificate: None,
            client_key: None,
            certificate_authority: None,
        })
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Sets basic-auth credentials.
    #[must_use]
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Sets PEM-encoded client certificate and key material.
    #[must_use]
    pub fn with_client_certificate(
        mut self,
        certificate: impl Into<Vec<u8>>,
        key: impl Into<Vec<u8>>,
    ) -> Self {
        self.client_certificate = Some(certificate.into());
        self.client_key = Some(key.into());
        self
    }

    /// Sets PEM-encoded certificate-authority material.
    #[must_use]
    pub fn with_certificate_authority(mut self, certificate_authority: impl Into<Vec<u8>>) -> Self {
        self.certificate_authority = Some(certificate_authority.into());
        self
    }

    /// Returns the host endpoint.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the bearer token, if any.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }

    /// Returns the basic-auth username, if any.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Returns the basic-auth password, if any.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Returns the client certificate material, if any.
    #[must_use]
    pub fn client_certificate(&self) -> Option<&[u8]> {
        self.client_certificate.as_deref()
    }

    /// Returns the client key material, if any.
    #[must_use]
    pub fn client_key(&self) -> Option<&[u8]> {
        self.client_key.as_deref()
    }

    /// Returns the certificate-authority material, if any.
    #[must_use]
    pub fn certificate_authority(&self) -> Option<&[u8]> {
        self.certificate_authority.as_deref()
    }
}

const REDACTED: &str = "<redacted>";

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| REDACTED))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| REDACTED))
            .field(
                "client_certificate",
                &self.client_certificate.as_ref().map(Vec::len),
            )
            .field("client_key", &self.client_key.as_ref().map(|_| REDACTED))
            .field(
                "certificate_authority",
                &self.certificate_authority.as_ref().map(Vec::len),
            )
            .finish()
    }
}
