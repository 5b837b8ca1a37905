//! Connector Framework configuration types
//!
//! Base trait, common connection settings, and the host-supplied connection.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ConnectorError, ConnectorResult};
use crate::ids::ConnectionName;

/// Trait for connector-specific configuration.
///
/// Each connector implements this trait to define its configuration
/// schema and validation rules.
pub trait ConnectorConfig: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Short name of the connector this configuration is for.
    fn connector_name() -> &'static str;

    /// Validate the configuration.
    ///
    /// Returns an error if the configuration is invalid.
    fn validate(&self) -> ConnectorResult<()>;

    /// Create a redacted version of this config (for logging/display).
    ///
    /// Sensitive fields should be replaced with placeholders.
    fn redacted(&self) -> Self;
}

/// Common connection settings shared across connectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// TCP connect timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl ConnectionSettings {
    /// Create new connection settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    /// Get request timeout as Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get connect timeout as Duration.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Validate the settings.
    pub fn validate(&self) -> ConnectorResult<()> {
        if self.timeout_secs == 0 {
            return Err(ConnectorError::invalid_configuration(
                "timeout_secs must be greater than zero",
            ));
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConnectorError::invalid_configuration(
                "connect_timeout_secs must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// A configured host connection: its name plus the raw attribute block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Connection name, unique within the host.
    pub name: ConnectionName,

    /// Connector attributes as supplied by the host.
    #[serde(default)]
    pub config: serde_json::Value,
}

impl Connection {
    /// Create a connection.
    pub fn new(name: impl Into<ConnectionName>, config: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    /// Deserialize and validate the connector configuration.
    ///
    /// A missing or `null` attribute block parses as an empty object, so
    /// connectors with all-optional fields fall back to their defaults.
    pub fn parse_config<C: ConnectorConfig>(&self) -> ConnectorResult<C> {
        let value = if self.config.is_null() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            self.config.clone()
        };

        let config: C = serde_json::from_value(value).map_err(|e| {
            ConnectorError::invalid_configuration(format!(
                "connection '{}': invalid {} configuration: {e}",
                self.name,
                C::connector_name()
            ))
        })?;
        config.validate()?;
        Ok(config)
    }
}
