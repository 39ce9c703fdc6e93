//! Connector configuration types

use crate::codec::CodecConfig;
use crate::error::{Error, Result};
use crate::types::KeyValue;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Authentication scheme for a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// No Authorization header
    #[default]
    None,
    /// HTTP Basic authentication
    Basic,
    /// Bearer token authentication
    Bearer,
}

/// Configuration describing how to reach and authenticate against one backend
#[derive(Debug, Clone)]
pub struct Connector {
    /// Base endpoint all requests are resolved against
    pub endpoint: String,
    /// Authentication scheme
    pub auth: AuthMode,
    /// Pre-issued token, used verbatim when set
    pub token: Option<String>,
    /// Username for credential-derived auth
    pub username: Option<String>,
    /// Password for credential-derived auth
    pub password: Option<String>,
    /// Headers added to every request
    pub headers: Vec<KeyValue>,
    /// Properties merged into every JSON request body
    pub body_properties: Vec<KeyValue>,
    /// Hard deadline for each call
    pub timeout: Duration,
    /// Skip TLS certificate verification. Never toggled implicitly.
    pub insecure_skip_verify: bool,
    /// User agent sent with every request
    pub user_agent: String,
    /// JSON codec settings
    pub codec: CodecConfig,
}

impl Default for Connector {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            auth: AuthMode::None,
            token: None,
            username: None,
            password: None,
            headers: Vec::new(),
            body_properties: Vec::new(),
            timeout: Duration::from_secs(30),
            insecure_skip_verify: false,
            user_agent: format!("anyclient/{}", env!("CARGO_PKG_VERSION")),
            codec: CodecConfig::default(),
        }
    }
}

impl Connector {
    /// Create a new config builder
    pub fn builder() -> ConnectorBuilder {
        ConnectorBuilder::default()
    }

    /// Check the invariants required before any call can be dispatched
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.is_empty() {
            return Err(Error::invalid_request("endpoint must not be empty"));
        }
        if self.timeout.is_zero() {
            return Err(Error::invalid_request("timeout must be greater than zero"));
        }
        Ok(())
    }
}

/// Builder for connector config
#[derive(Default)]
pub struct ConnectorBuilder {
    connector: Connector,
}

impl ConnectorBuilder {
    /// Set the base endpoint
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.connector.endpoint = endpoint.into();
        self
    }

    /// Set the authentication scheme
    pub fn auth(mut self, auth: AuthMode) -> Self {
        self.connector.auth = auth;
        self
    }

    /// Set the pre-issued token
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.connector.token = Some(token.into());
        self
    }

    /// Set the username and password
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.connector.username = Some(username.into());
        self.connector.password = Some(password.into());
        self
    }

    /// Add a default header, sent with every call
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.connector.headers.push(KeyValue::new(name, value));
        self
    }

    /// Add a property merged into every JSON request body
    pub fn body_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.connector
            .body_properties
            .push(KeyValue::new(name, value));
        self
    }

    /// Set the per-call timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.connector.timeout = timeout;
        self
    }

    /// Skip TLS certificate verification
    pub fn insecure_skip_verify(mut self, skip: bool) -> Self {
        self.connector.insecure_skip_verify = skip;
        self
    }

    /// Set the user agent string
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.connector.user_agent = agent.into();
        self
    }

    /// Set the JSON codec configuration
    pub fn codec(mut self, codec: CodecConfig) -> Self {
        self.connector.codec = codec;
        self
    }

    /// Build the connector
    pub fn build(self) -> Connector {
        self.connector
    }
}
