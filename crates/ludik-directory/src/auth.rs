//! OAuth2 client-credentials token cache for the Provider API.

use crate::config::ProviderConfig;
use crate::error::{DirectoryError, DirectoryResult};
use chrono::{DateTime, Duration, Utc};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

/// OAuth2 token response from the Provider's token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// A cached access token with its absolute expiry instant.
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// True if the token is expired or has less than `margin` remaining.
    fn is_stale(&self, margin: Duration) -> bool {
        Utc::now() + margin >= self.expires_at
    }
}

/// Cache holding at most one Provider access token.
///
/// The cached slot is guarded by a mutex that is held across the refresh
/// call, so concurrent callers observing a stale token collapse into a
/// single refresh: the first one performs it, the rest find the fresh
/// token when the lock is released. No retry happens here; callers decide
/// whether to retry.
pub struct TokenCache {
    config: ProviderConfig,
    http_client: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    /// Create a token cache using the given HTTP client for token requests.
    pub fn new(config: ProviderConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
            cached: Mutex::new(None),
        }
    }

    /// Return a bearer token with at least the configured safety margin
    /// remaining, refreshing transparently if the cached one is absent or
    /// stale.
    pub async fn current(&self) -> DirectoryResult<String> {
        let margin = Duration::from_std(self.config.token_safety_margin)
            .unwrap_or_else(|_| Duration::seconds(60));

        let mut cached = self.cached.lock().await;
        if let Some(ref token) = *cached {
            if !token.is_stale(margin) {
                return Ok(token.access_token.clone());
            }
        }

        debug!(provider = %self.config.name, "Refreshing Provider access token");
        let fresh = self.refresh().await?;
        let access_token = fresh.access_token.clone();
        *cached = Some(fresh);
        Ok(access_token)
    }

    /// Drop the cached token so the next [`current`](Self::current) call
    /// performs a refresh regardless of expiry. Called after an
    /// authentication failure from the Provider.
    pub async fn invalidate(&self) {
        let mut cached = self.cached.lock().await;
        *cached = None;
    }

    /// Perform the client-credentials grant against the token endpoint.
    async fn refresh(&self) -> DirectoryResult<CachedToken> {
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", &self.config.client_id),
            ("client_secret", self.config.client_secret.expose_secret()),
        ];

        let response = self
            .http_client
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| DirectoryError::network(&self.config.name, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectoryError::api(
                &self.config.name,
                status.as_u16(),
                &body,
            ));
        }

        let token_response: TokenResponse = response.json().await.map_err(|e| {
            DirectoryError::malformed(
                &self.config.name,
                format!("failed to parse token response: {e}"),
            )
        })?;

        if token_response.access_token.is_empty() {
            return Err(DirectoryError::malformed(
                &self.config.name,
                "token response carried no access token",
            ));
        }

        let expires_at = Utc::now() + Duration::seconds(token_response.expires_in);
        debug!(
            provider = %self.config.name,
            expires_at = %expires_at,
            "Acquired new access token"
        );

        Ok(CachedToken {
            access_token: token_response.access_token,
            expires_at,
        })
    }
}
