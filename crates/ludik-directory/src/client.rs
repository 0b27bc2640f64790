//! Typed HTTP client for the Provider's directory endpoints.

use crate::auth::TokenCache;
use crate::config::ProviderConfig;
use crate::error::{DirectoryError, DirectoryResult};
use crate::models::{DirectoryPage, RemoteOrganization};
use reqwest::StatusCode;
use std::sync::Arc;
use tracing::debug;

/// Client wrapping the Provider's paginated directory search and
/// single-organization lookup.
///
/// Every call attaches a bearer token from the shared [`TokenCache`]. On
/// a 401 the cached token is invalidated and the error is surfaced without
/// an internal retry — retrying is the batch layer's responsibility.
#[derive(Clone)]
pub struct DirectoryClient {
    provider: String,
    base_url: String,
    http_client: reqwest::Client,
    tokens: Arc<TokenCache>,
}

impl DirectoryClient {
    /// Build a client from the Provider configuration.
    ///
    /// A single reqwest client carries both directory calls and token
    /// refreshes; connect and request timeouts come from the config.
    pub fn new(config: ProviderConfig) -> DirectoryResult<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent("ludik-directory/1.0")
            .build()
            .map_err(|e| {
                DirectoryError::InvalidConfig(format!("failed to build HTTP client: {e}"))
            })?;

        let provider = config.name.clone();
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let tokens = Arc::new(TokenCache::new(config, http_client.clone()));

        Ok(Self {
            provider,
            base_url,
            http_client,
            tokens,
        })
    }

    /// Create a client with a pre-built reqwest client and token cache
    /// (for testing).
    pub fn with_parts(
        provider: impl Into<String>,
        base_url: impl Into<String>,
        http_client: reqwest::Client,
        tokens: Arc<TokenCache>,
    ) -> Self {
        Self {
            provider: provider.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
            tokens,
        }
    }

    /// The token cache backing this client.
    pub fn tokens(&self) -> &Arc<TokenCache> {
        &self.tokens
    }

    /// The provider name carried in errors.
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Search the directory for organizations in a geographic area.
    pub async fn search_organizations(
        &self,
        city: &str,
        page_index: u32,
        page_size: u32,
    ) -> DirectoryResult<DirectoryPage> {
        let url = format!("{}/organizations", self.base_url);
        debug!(provider = %self.provider, city, page_index, page_size, "Directory search");

        let token = self.tokens.current().await?;
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("city", city.to_string()),
                ("pageIndex", page_index.to_string()),
                ("pageSize", page_size.to_string()),
            ])
            .send()
            .await
            .map_err(|e| DirectoryError::network(&self.provider, &e))?;

        let status = response.status();
        if !status.is_success() {
            return self.handle_error_response(response).await;
        }

        let body = response
            .text()
            .await
            .map_err(|e| DirectoryError::network(&self.provider, &e))?;
        serde_json::from_str(&body).map_err(|e| {
            DirectoryError::malformed(&self.provider, format!("search response: {e}"))
        })
    }

    /// Fetch a single organization by slug.
    ///
    /// The Provider sometimes answers 200 with no body; this is surfaced
    /// as [`DirectoryError::EmptyResponse`], a terminal fetch failure, not
    /// a not-found.
    pub async fn get_organization(&self, slug: &str) -> DirectoryResult<RemoteOrganization> {
        let url = format!("{}/organizations/{}", self.base_url, slug);
        debug!(provider = %self.provider, slug, "Directory lookup");

        let token = self.tokens.current().await?;
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| DirectoryError::network(&self.provider, &e))?;

        let status = response.status();
        if !status.is_success() {
            return self.handle_error_response(response).await;
        }

        let body = response
            .text()
            .await
            .map_err(|e| DirectoryError::network(&self.provider, &e))?;
        if body.trim().is_empty() {
            return Err(DirectoryError::EmptyResponse {
                provider: self.provider.clone(),
                slug: slug.to_string(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            DirectoryError::malformed(&self.provider, format!("organization response: {e}"))
        })
    }

    /// Map a non-2xx response into a [`DirectoryError`], invalidating the
    /// cached token on authentication failure.
    async fn handle_error_response<T>(&self, response: reqwest::Response) -> DirectoryResult<T> {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status == StatusCode::UNAUTHORIZED {
            self.tokens.invalidate().await;
        }

        Err(DirectoryError::api(&self.provider, status.as_u16(), &body))
    }
}
