//! Error types for the Google Workspace Directory connector.

use thiserror::Error;
use xavyo_connector::error::ConnectorError;

/// Result type alias using `GoogleError`.
pub type GoogleResult<T> = Result<T, GoogleError>;

/// Errors that can occur when interacting with the Directory API.
#[derive(Debug, Error)]
pub enum GoogleError {
    /// Configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential loading or `OAuth2` authentication error.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Token endpoint rejected the grant.
    #[error("Token refresh failed: {0}")]
    TokenRefresh(String),

    /// Directory API error response.
    #[error("Directory API error {status}: {message}")]
    DirectoryApi {
        status: u16,
        message: String,
        reason: Option<String>,
    },

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Assertion signing error.
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// One or more per-group member listings failed.
    #[error("Listing members failed for {} group(s): {}", .failures.len(), format_failures(.failures))]
    GroupMemberFanOut { failures: Vec<(String, String)> },
}

fn format_failures(failures: &[(String, String)]) -> String {
    failures
        .iter()
        .map(|(group, err)| format!("{group}: {err}"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<GoogleError> for ConnectorError {
    fn from(err: GoogleError) -> Self {
        match err {
            GoogleError::Config(message) => ConnectorError::InvalidConfiguration { message },
            GoogleError::Auth(message) | GoogleError::TokenRefresh(message) => {
                ConnectorError::AuthenticationFailed { message }
            }
            GoogleError::Jwt(e) => ConnectorError::AuthenticationFailed {
                message: format!("failed to sign assertion: {e}"),
            },
            GoogleError::DirectoryApi {
                status,
                message,
                reason,
            } => ConnectorError::Upstream {
                status,
                message,
                reason,
            },
            GoogleError::Http(e) => {
                if e.is_connect() || e.is_timeout() {
                    ConnectorError::connection_failed_with_source("Directory API unreachable", e)
                } else {
                    ConnectorError::network_with_source("Directory API request failed", e)
                }
            }
            GoogleError::Json(e) => ConnectorError::InvalidData {
                message: format!("unexpected Directory API response: {e}"),
            },
            GoogleError::Url(e) => ConnectorError::invalid_configuration(format!("invalid URL: {e}")),
            err @ GoogleError::GroupMemberFanOut { .. } => ConnectorError::Internal {
                message: err.to_string(),
                source: None,
            },
        }
    }
}
