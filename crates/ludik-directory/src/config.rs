//! Provider connection settings.

use secrecy::SecretString;
use std::time::Duration;

/// Configuration for one Provider directory endpoint.
///
/// The [`Debug`] impl redacts the client secret to prevent accidental
/// credential exposure in log output.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Human-readable provider name, carried in errors ("helloasso").
    pub name: String,
    /// Base URL of the directory API, without trailing slash.
    pub base_url: String,
    /// OAuth2 token endpoint URL.
    pub token_url: String,
    /// OAuth2 client credentials.
    pub client_id: String,
    pub client_secret: SecretString,
    /// Connect timeout for every outbound call.
    pub connect_timeout: Duration,
    /// Total request timeout for every outbound call.
    pub request_timeout: Duration,
    /// Minimum remaining token lifetime below which a proactive refresh
    /// is triggered.
    pub token_safety_margin: Duration,
}

impl ProviderConfig {
    /// Create a config with default timeouts (5s connect, 30s request)
    /// and a 60s token safety margin.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: SecretString,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret,
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            token_safety_margin: Duration::from_secs(60),
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("token_safety_margin", &self.token_safety_margin)
            .finish()
    }
}
