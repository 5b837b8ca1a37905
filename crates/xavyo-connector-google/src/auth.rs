//! OAuth2 authentication for the Directory API.
//!
//! Two grants are supported: the JWT-bearer grant of a service account
//! (optionally delegated to a Workspace user) and the refresh-token grant of
//! an authorized user credential file.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::config::{CredentialSource, KeySource};
use crate::{GoogleError, GoogleResult};

/// Google's OAuth2 token endpoint.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime of a signed assertion; Google rejects anything longer.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Service account key file.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: SecretString,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

/// Authorized user credential file, as written by `gcloud auth`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizedUser {
    pub client_id: String,
    pub client_secret: SecretString,
    pub refresh_token: SecretString,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

/// A parsed credential file, selected by its `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GoogleCredentials {
    ServiceAccount(ServiceAccountKey),
    AuthorizedUser(AuthorizedUser),
}

impl GoogleCredentials {
    /// Parse credential JSON.
    pub fn from_json(json: &str) -> GoogleResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| GoogleError::Auth(format!("Invalid credential JSON: {e}")))
    }

    /// Read and parse a credential file.
    pub async fn from_file(path: &Path) -> GoogleResult<Self> {
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            GoogleError::Auth(format!(
                "Failed to read credential file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&json)
    }

    /// Token endpoint the credential exchanges grants with.
    pub fn token_uri(&self) -> &str {
        match self {
            GoogleCredentials::ServiceAccount(key) => &key.token_uri,
            GoogleCredentials::AuthorizedUser(user) => &user.token_uri,
        }
    }
}

/// `OAuth2` token response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    #[allow(dead_code)]
    token_type: String,
}

/// `OAuth2` error response.
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Claims of the JWT-bearer assertion.
#[derive(Debug, Serialize, Deserialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
}

/// Cached OAuth2 access token.
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Returns true if the token is expired or will expire within the grace period.
    fn is_expired(&self, grace_period: Duration) -> bool {
        Utc::now() + grace_period >= self.expires_at
    }
}

/// Token cache for managing OAuth2 access tokens.
#[derive(Debug)]
pub struct TokenCache {
    credentials: GoogleCredentials,
    subject: Option<String>,
    scopes: Vec<String>,
    http_client: reqwest::Client,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    /// Grace period before expiry to trigger refresh (default: 5 minutes).
    grace_period: Duration,
}

impl TokenCache {
    /// Creates a new token cache.
    pub fn new(
        credentials: GoogleCredentials,
        subject: Option<String>,
        scopes: Vec<String>,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            credentials,
            subject,
            scopes,
            http_client,
            cached_token: Arc::new(RwLock::new(None)),
            grace_period: Duration::minutes(5),
        }
    }

    /// Loads the credentials a resolved configuration points at.
    ///
    /// A delegated service account must be given a service account key; a
    /// token file may hold either kind and is used without a subject.
    pub async fn from_source(
        source: &CredentialSource,
        scopes: Vec<String>,
        http_client: reqwest::Client,
    ) -> GoogleResult<Self> {
        match source {
            CredentialSource::ServiceAccount { key, subject } => {
                let credentials = match key {
                    KeySource::Inline(json) => GoogleCredentials::from_json(json)?,
                    KeySource::File(path) => GoogleCredentials::from_file(path).await?,
                };
                if !matches!(credentials, GoogleCredentials::ServiceAccount(_)) {
                    return Err(GoogleError::Config(
                        "credentials must be a service account key".to_string(),
                    ));
                }
                Ok(Self::new(
                    credentials,
                    Some(subject.clone()),
                    scopes,
                    http_client,
                ))
            }
            CredentialSource::TokenFile(path) => {
                let credentials = GoogleCredentials::from_file(path).await?;
                Ok(Self::new(credentials, None, scopes, http_client))
            }
        }
    }

    /// Gets a valid access token, refreshing if necessary.
    #[instrument(skip(self), fields(subject = ?self.subject))]
    pub async fn get_token(&self) -> GoogleResult<String> {
        // Check if we have a valid cached token
        {
            let cache = self.cached_token.read().await;
            if let Some(ref token) = *cache {
                if !token.is_expired(self.grace_period) {
                    debug!("Using cached token");
                    return Ok(token.access_token.clone());
                }
            }
        }

        // Concurrent callers queue here; only the first one refreshes
        let mut cache = self.cached_token.write().await;
        if let Some(ref token) = *cache {
            if !token.is_expired(self.grace_period) {
                debug!("Token refreshed by another caller");
                return Ok(token.access_token.clone());
            }
        }

        debug!("Refreshing access token");
        let new_token = self.acquire_token().await?;
        let access_token = new_token.access_token.clone();
        *cache = Some(new_token);

        Ok(access_token)
    }

    /// Acquires a new access token from the credential's token endpoint.
    #[instrument(skip(self))]
    async fn acquire_token(&self) -> GoogleResult<CachedToken> {
        let request = match &self.credentials {
            GoogleCredentials::ServiceAccount(key) => {
                let assertion = self.sign_assertion(key, Utc::now())?;
                self.http_client.post(&key.token_uri).form(&[
                    ("grant_type", JWT_BEARER_GRANT),
                    ("assertion", assertion.as_str()),
                ])
            }
            GoogleCredentials::AuthorizedUser(user) => {
                self.http_client.post(&user.token_uri).form(&[
                    ("grant_type", "refresh_token"),
                    ("client_id", user.client_id.as_str()),
                    ("client_secret", user.client_secret.expose_secret().as_str()),
                    ("refresh_token", user.refresh_token.expose_secret().as_str()),
                ])
            }
        };

        let response = request
            .send()
            .await
            .map_err(|e| GoogleError::Auth(format!("Token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(err) => match err.error_description {
                    Some(description) => format!("{}: {}", err.error, description),
                    None => err.error,
                },
                Err(_) => body,
            };
            return Err(GoogleError::TokenRefresh(format!(
                "token endpoint returned {status}: {detail}"
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| GoogleError::Auth(format!("Failed to parse token response: {e}")))?;

        let expires_at = Utc::now() + Duration::seconds(token_response.expires_in);

        debug!(
            "Acquired new token, expires at {}",
            expires_at.format("%Y-%m-%d %H:%M:%S UTC")
        );

        Ok(CachedToken {
            access_token: token_response.access_token,
            expires_at,
        })
    }

    /// Signs the RS256 assertion exchanged for a service account token.
    fn sign_assertion(&self, key: &ServiceAccountKey, now: DateTime<Utc>) -> GoogleResult<String> {
        let iat = now.timestamp();
        let claims = AssertionClaims {
            iss: key.client_email.clone(),
            scope: self.scopes.join(" "),
            aud: key.token_uri.clone(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
            sub: self.subject.clone(),
        };

        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.expose_secret().as_bytes())
            .map_err(|e| GoogleError::Auth(format!("Invalid private key: {e}")))?;

        let mut header = Header::new(Algorithm::RS256);
        header.kid = key.private_key_id.clone();

        Ok(encode(&header, &claims, &encoding_key)?)
    }

    /// Invalidates the cached token, forcing a refresh on next use.
    pub async fn invalidate(&self) {
        let mut cache = self.cached_token.write().await;
        *cache = None;
    }
}
