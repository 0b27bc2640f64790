//! HTTP client layer for the Provider's organization directory.
//!
//! Wraps the Provider's OAuth2 token endpoint and paginated directory
//! search behind typed calls. Token lifetime is handled by [`TokenCache`];
//! transport and HTTP failures are mapped into [`DirectoryError`] so the
//! batch layer can apply its retry/skip policy uniformly.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod retry;

pub use auth::TokenCache;
pub use client::DirectoryClient;
pub use config::ProviderConfig;
pub use error::{DirectoryError, DirectoryResult};
pub use models::{DirectoryPage, PageInfo, RemoteOrganization};
pub use retry::RetryPolicy;
