//! Directory API HTTP client with page-token pagination.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::auth::TokenCache;
use crate::config::GoogleDirectoryConfig;
use crate::models::ListResponse;
use crate::{GoogleError, GoogleResult};

/// Error envelope returned by Google APIs.
#[derive(Debug, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

/// Error body of the envelope.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub reason: Option<String>,
}

/// Google Workspace Directory API client.
#[derive(Debug)]
pub struct DirectoryClient {
    http_client: reqwest::Client,
    token_cache: Arc<TokenCache>,
    config: GoogleDirectoryConfig,
}

impl DirectoryClient {
    /// Creates a client for a connection's configuration.
    ///
    /// Loads the configured credentials; no request is sent until the first
    /// call needs a token.
    ///
    /// # Errors
    ///
    /// Returns an error if no credential is usable or it cannot be loaded.
    #[instrument(skip(config))]
    pub async fn connect(config: GoogleDirectoryConfig) -> GoogleResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.connection.timeout())
            .connect_timeout(config.connection.connect_timeout())
            .build()
            .map_err(|e| GoogleError::Config(format!("Failed to create HTTP client: {e}")))?;

        let source = config.credential_source()?;
        let token_cache =
            TokenCache::from_source(&source, config.scopes.clone(), http_client.clone()).await?;

        debug!(base_url = %config.base_url, "Directory client ready");
        Ok(Self::new(http_client, Arc::new(token_cache), config))
    }

    /// Creates a client from its parts.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        token_cache: Arc<TokenCache>,
        config: GoogleDirectoryConfig,
    ) -> Self {
        Self {
            http_client,
            token_cache,
            config,
        }
    }

    /// The configuration this client was built from.
    #[must_use]
    pub fn config(&self) -> &GoogleDirectoryConfig {
        &self.config
    }

    /// Builds an API URL from path segments.
    pub fn url(&self, segments: &[&str]) -> GoogleResult<Url> {
        self.config.url(segments)
    }

    /// Performs a GET request with bearer token injection.
    #[instrument(skip(self, url), fields(url = %url))]
    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> GoogleResult<T> {
        let token = self.token_cache.get_token().await?;

        let response = self
            .http_client
            .get(url)
            .bearer_auth(&token)
            .send()
            .await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            // Revoked or rotated upstream; the next call fetches a fresh token
            self.token_cache.invalidate().await;
        }

        let body = response.text().await.unwrap_or_default();
        let err = parse_api_error(status.as_u16(), &body);
        warn!(status = status.as_u16(), error = %err, "Directory API request failed");
        Err(err)
    }

    /// Starts paging through a list endpoint.
    #[must_use]
    pub fn pager<R: ListResponse>(&self, url: Url) -> Pager<'_, R> {
        Pager {
            client: self,
            url,
            next_token: None,
            finished: false,
            _response: std::marker::PhantomData,
        }
    }
}

/// Turns an error response body into a typed error.
fn parse_api_error(status: u16, body: &str) -> GoogleError {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => {
            let ApiErrorBody {
                code,
                message,
                errors,
                status: status_text,
            } = envelope.error;
            let reason = errors
                .into_iter()
                .find_map(|e| e.reason)
                .or(status_text);
            GoogleError::DirectoryApi {
                status: code.unwrap_or(status),
                message,
                reason,
            }
        }
        Err(_) => GoogleError::DirectoryApi {
            status,
            message: body.trim().to_string(),
            reason: None,
        },
    }
}

/// Walks the pages of a list endpoint by `pageToken`.
pub struct Pager<'a, R> {
    client: &'a DirectoryClient,
    url: Url,
    next_token: Option<String>,
    finished: bool,
    _response: std::marker::PhantomData<fn() -> R>,
}

impl<R: ListResponse> Pager<'_, R> {
    /// Fetches the next page, or `None` after the last one.
    pub async fn next_page(&mut self) -> GoogleResult<Option<Vec<R::Item>>> {
        if self.finished {
            return Ok(None);
        }

        let mut url = self.url.clone();
        if let Some(token) = &self.next_token {
            url.query_pairs_mut().append_pair("pageToken", token);
        }

        let response: R = self.client.get(url).await?;
        let (items, next_token) = response.into_page();
        debug!(
            items = items.len(),
            more = next_token.is_some(),
            "Fetched page"
        );

        self.finished = next_token.is_none();
        self.next_token = next_token;
        Ok(Some(items))
    }

    /// Fetches every remaining page.
    pub async fn collect(mut self) -> GoogleResult<Vec<R::Item>> {
        let mut all = Vec::new();
        while let Some(items) = self.next_page().await? {
            all.extend(items);
        }
        Ok(all)
    }
}
