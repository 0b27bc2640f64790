//! Error types for the Provider directory layer.

use thiserror::Error;

/// Result type alias using [`DirectoryError`].
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Maximum length of a response-body snippet embedded in an error.
const BODY_SNIPPET_LEN: usize = 256;

/// Errors that can occur when talking to the Provider.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The Provider returned a non-2xx status or was unreachable.
    ///
    /// `status` is the HTTP status code, or 0 for network-level failures
    /// (connect/read timeouts, DNS, refused connections).
    #[error("{provider} API error (status {status}): {detail}")]
    Api {
        provider: String,
        status: u16,
        detail: String,
    },

    /// The Provider answered 200 with an empty body on a single-organization
    /// lookup. Distinct from not-found: the fetch failed, the record may
    /// well exist.
    #[error("{provider} returned an empty response for organization '{slug}'")]
    EmptyResponse { provider: String, slug: String },

    /// The Provider's response body could not be parsed. Retrying will not
    /// fix a structurally bad payload.
    #[error("{provider} returned a malformed response: {detail}")]
    Malformed { provider: String, detail: String },

    /// Client-side configuration problem (bad base URL, unbuildable client).
    #[error("Invalid directory client configuration: {0}")]
    InvalidConfig(String),
}

impl DirectoryError {
    /// Build an [`DirectoryError::Api`] for a network-level failure (status 0).
    pub fn network(provider: impl Into<String>, cause: &reqwest::Error) -> Self {
        Self::Api {
            provider: provider.into(),
            status: 0,
            detail: cause.to_string(),
        }
    }

    /// Build an [`DirectoryError::Api`] from an HTTP status and body.
    pub fn api(provider: impl Into<String>, status: u16, body: &str) -> Self {
        Self::Api {
            provider: provider.into(),
            status,
            detail: body_snippet(body),
        }
    }

    /// Build a [`DirectoryError::Malformed`] error.
    pub fn malformed(provider: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Malformed {
            provider: provider.into(),
            detail: detail.into(),
        }
    }

    /// Whether this error is a transient external-API failure.
    ///
    /// Transient errors are eligible for the batch layer's retry and skip
    /// budgets; malformed or empty payloads are not, since retrying cannot
    /// fix them.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}

/// Truncate a response body for inclusion in an error message.
fn body_snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<no body>".to_string();
    }
    match trimmed.char_indices().nth(BODY_SNIPPET_LEN) {
        Some((idx, _)) => format!("{}…", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
