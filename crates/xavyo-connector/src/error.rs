//! Connector Framework error types
//!
//! Errors surfaced to the host engine. Connectors convert their own error
//! types into [`ConnectorError`] at the plugin boundary.

use thiserror::Error;

/// Error that can occur while serving a table scan or lookup.
#[derive(Debug, Error)]
pub enum ConnectorError {
    // Configuration errors (permanent)
    /// Connection configuration is missing or invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Credentials could not be loaded or exchanged for a token.
    #[error("authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // Transport errors
    /// Failed to reach the upstream system.
    #[error("connection failed: {message}")]
    ConnectionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Network error during communication.
    #[error("network error: {message}")]
    NetworkError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The upstream API answered with an error status.
    #[error("upstream error {status}: {message}")]
    Upstream {
        status: u16,
        message: String,
        reason: Option<String>,
    },

    // Dispatch errors
    /// The requested table is not served by this plugin.
    #[error("table '{table}' not found")]
    TableNotFound { table: String },

    /// The table has no get entry point.
    #[error("table '{table}' does not support get")]
    GetNotSupported { table: String },

    /// The host went away or cancelled the scan.
    #[error("scan cancelled")]
    Cancelled,

    // Data errors
    /// Invalid data format.
    #[error("invalid data: {message}")]
    InvalidData { message: String },

    /// Serialization error.
    #[error("serialization error: {message}")]
    Serialization { message: String },

    // Internal errors
    /// Internal error.
    #[error("internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ConnectorError {
    /// Get an error code for classification.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConnectorError::InvalidConfiguration { .. } => "INVALID_CONFIG",
            ConnectorError::AuthenticationFailed { .. } => "AUTH_FAILED",
            ConnectorError::ConnectionFailed { .. } => "CONNECTION_FAILED",
            ConnectorError::NetworkError { .. } => "NETWORK_ERROR",
            ConnectorError::Upstream { .. } => "UPSTREAM_ERROR",
            ConnectorError::TableNotFound { .. } => "TABLE_NOT_FOUND",
            ConnectorError::GetNotSupported { .. } => "GET_NOT_SUPPORTED",
            ConnectorError::Cancelled => "CANCELLED",
            ConnectorError::InvalidData { .. } => "INVALID_DATA",
            ConnectorError::Serialization { .. } => "SERIALIZATION_ERROR",
            ConnectorError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Whether the error comes from a bad or missing connection configuration.
    ///
    /// Configuration errors are fatal for every table of the connection.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ConnectorError::InvalidConfiguration { .. }
                | ConnectorError::AuthenticationFailed { .. }
        )
    }

    /// HTTP status of an upstream API error, if this is one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            ConnectorError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }

    // Convenience constructors

    /// Create an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        ConnectorError::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create an authentication error.
    pub fn authentication_failed(message: impl Into<String>) -> Self {
        ConnectorError::AuthenticationFailed {
            message: message.into(),
        }
    }

    /// Create a connection failed error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        ConnectorError::ConnectionFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection failed error with source.
    pub fn connection_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ConnectorError::ConnectionFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a network error with source.
    pub fn network_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ConnectorError::NetworkError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an upstream API error.
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        ConnectorError::Upstream {
            status,
            message: message.into(),
            reason: None,
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ConnectorError::Internal {
            message: message.into(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for ConnectorError {
    fn from(err: serde_json::Error) -> Self {
        ConnectorError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;
