//! Google Workspace Directory connector configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use xavyo_connector::config::{ConnectionSettings, ConnectorConfig};
use xavyo_connector::error::{ConnectorError, ConnectorResult};

use crate::{GoogleError, GoogleResult};

/// Directory API v1 root.
pub const DEFAULT_BASE_URL: &str = "https://admin.googleapis.com/admin/directory/v1";

/// Read-only scopes requested by default.
pub const DEFAULT_SCOPES: [&str; 5] = [
    "https://www.googleapis.com/auth/admin.directory.domain.readonly",
    "https://www.googleapis.com/auth/admin.directory.group.readonly",
    "https://www.googleapis.com/auth/admin.directory.orgunit.readonly",
    "https://www.googleapis.com/auth/admin.directory.rolemanagement.readonly",
    "https://www.googleapis.com/auth/admin.directory.user.readonly",
];

/// What happens when one group of the member fan-out fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberErrorPolicy {
    /// Abort on the first failure and cancel the remaining workers.
    #[default]
    FailFast,
    /// Let every worker finish, then report all failures together.
    CollectAll,
}

/// Configuration for the Google Workspace Directory connector.
#[derive(Clone, Serialize, Deserialize)]
pub struct GoogleDirectoryConfig {
    /// Service account key: a file path or the JSON content itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,

    /// Deprecated path-only alias of `credentials`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_file: Option<String>,

    /// Subject for domain-wide delegation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impersonated_user_email: Option<String>,

    /// Path to an OAuth credential file (authorized user or service account).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_path: Option<String>,

    /// Directory API root.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// OAuth scopes requested for the access token.
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,

    /// Connection settings (timeouts).
    #[serde(flatten)]
    pub connection: ConnectionSettings,

    /// Maximum number of groups whose members are listed at once.
    #[serde(default = "default_member_concurrency")]
    pub member_concurrency: usize,

    /// Error policy of the group member fan-out.
    #[serde(default)]
    pub member_error_policy: MemberErrorPolicy,
}

impl std::fmt::Debug for GoogleDirectoryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Paths are harmless; inline key content is not.
        let credentials = self.credentials.as_deref().map(|c| {
            if is_inline_json(c) {
                "***REDACTED***"
            } else {
                c
            }
        });
        f.debug_struct("GoogleDirectoryConfig")
            .field("credentials", &credentials)
            .field("credential_file", &self.credential_file)
            .field("impersonated_user_email", &self.impersonated_user_email)
            .field("token_path", &self.token_path)
            .field("base_url", &self.base_url)
            .field("scopes", &self.scopes)
            .field("connection", &self.connection)
            .field("member_concurrency", &self.member_concurrency)
            .field("member_error_policy", &self.member_error_policy)
            .finish()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_scopes() -> Vec<String> {
    DEFAULT_SCOPES.iter().map(|s| (*s).to_string()).collect()
}

fn default_member_concurrency() -> usize {
    10
}

impl Default for GoogleDirectoryConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            credential_file: None,
            impersonated_user_email: None,
            token_path: None,
            base_url: default_base_url(),
            scopes: default_scopes(),
            connection: ConnectionSettings::default(),
            member_concurrency: default_member_concurrency(),
            member_error_policy: MemberErrorPolicy::default(),
        }
    }
}

/// Where a service account key comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum KeySource {
    /// JSON content supplied inline.
    Inline(String),
    /// Path to a JSON key file.
    File(PathBuf),
}

impl std::fmt::Debug for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::Inline(_) => f.write_str("Inline(***REDACTED***)"),
            KeySource::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

/// The single credential strategy a configuration resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Service account key with domain-wide delegation to `subject`.
    ServiceAccount { key: KeySource, subject: String },
    /// OAuth credential file; its `type` field selects the grant.
    TokenFile(PathBuf),
}

impl GoogleDirectoryConfig {
    /// Create a config with default settings and no credentials.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set service account credentials (path or JSON content).
    pub fn with_credentials(mut self, credentials: impl Into<String>) -> Self {
        self.credentials = Some(credentials.into());
        self
    }

    /// Set the deprecated credential file path.
    pub fn with_credential_file(mut self, path: impl Into<String>) -> Self {
        self.credential_file = Some(path.into());
        self
    }

    /// Set the delegation subject.
    pub fn with_impersonated_user(mut self, email: impl Into<String>) -> Self {
        self.impersonated_user_email = Some(email.into());
        self
    }

    /// Set an OAuth credential file path.
    pub fn with_token_path(mut self, path: impl Into<String>) -> Self {
        self.token_path = Some(path.into());
        self
    }

    /// Override the Directory API root.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Replace the requested scopes.
    pub fn with_scopes(mut self, scopes: &[&str]) -> Self {
        self.scopes = scopes.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.connection = self.connection.with_timeout(secs);
        self
    }

    /// Set the worker bound of the member fan-out.
    #[must_use]
    pub fn with_member_concurrency(mut self, workers: usize) -> Self {
        self.member_concurrency = workers;
        self
    }

    /// Set the member fan-out error policy.
    #[must_use]
    pub fn with_member_error_policy(mut self, policy: MemberErrorPolicy) -> Self {
        self.member_error_policy = policy;
        self
    }

    /// Resolve the credential strategy.
    ///
    /// `credentials` (or the deprecated `credential_file`) wins over
    /// `token_path`. A service account key requires a delegation subject.
    pub fn credential_source(&self) -> GoogleResult<CredentialSource> {
        let inline_or_path = non_blank(self.credentials.as_deref());
        let legacy_path = non_blank(self.credential_file.as_deref());

        let key = match (inline_or_path, legacy_path) {
            (Some(c), _) if is_inline_json(c) => Some(KeySource::Inline(c.to_string())),
            (Some(c), _) => Some(KeySource::File(expand_home(c))),
            (None, Some(p)) => Some(KeySource::File(expand_home(p))),
            (None, None) => None,
        };

        if let Some(key) = key {
            let subject = non_blank(self.impersonated_user_email.as_deref()).ok_or_else(|| {
                GoogleError::Config(
                    "impersonated_user_email must be configured when using credentials"
                        .to_string(),
                )
            })?;
            return Ok(CredentialSource::ServiceAccount {
                key,
                subject: subject.to_string(),
            });
        }

        if let Some(path) = non_blank(self.token_path.as_deref()) {
            return Ok(CredentialSource::TokenFile(expand_home(path)));
        }

        Err(GoogleError::Config(
            "no usable credential: set credentials (with impersonated_user_email) or token_path"
                .to_string(),
        ))
    }

    /// Build a Directory API URL from path segments.
    ///
    /// Segments are percent-encoded individually.
    pub fn url(&self, segments: &[&str]) -> GoogleResult<url::Url> {
        let mut url = url::Url::parse(self.base_url.trim_end_matches('/'))?;
        url.path_segments_mut()
            .map_err(|()| GoogleError::Config(format!("base_url cannot be a base: {}", self.base_url)))?
            .extend(segments);
        Ok(url)
    }
}

impl ConnectorConfig for GoogleDirectoryConfig {
    fn connector_name() -> &'static str {
        "googledirectory"
    }

    fn validate(&self) -> ConnectorResult<()> {
        let url = url::Url::parse(&self.base_url).map_err(|e| {
            ConnectorError::invalid_configuration(format!("invalid base_url: {e}"))
        })?;
        if url.cannot_be_a_base() {
            return Err(ConnectorError::invalid_configuration(format!(
                "invalid base_url: {}",
                self.base_url
            )));
        }

        if self.scopes.iter().all(|s| s.trim().is_empty()) {
            return Err(ConnectorError::invalid_configuration(
                "scopes must not be empty",
            ));
        }

        if self.member_concurrency == 0 {
            return Err(ConnectorError::invalid_configuration(
                "member_concurrency must be at least 1",
            ));
        }

        self.connection.validate()
    }

    fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.credentials.as_deref().is_some_and(is_inline_json) {
            config.credentials = Some("***REDACTED***".to_string());
        }
        config
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Inline key content is a JSON object; anything else is a path.
fn is_inline_json(value: &str) -> bool {
    value.trim_start().starts_with('{')
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}
