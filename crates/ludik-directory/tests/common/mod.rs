//! Shared helpers for directory client tests.

#![allow(dead_code)]

use ludik_directory::{DirectoryClient, ProviderConfig, TokenCache};
use secrecy::SecretString;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Provider config pointing at a wiremock server.
pub fn provider_config(server: &MockServer) -> ProviderConfig {
    let mut config = ProviderConfig::new(
        "helloasso",
        server.uri(),
        format!("{}/oauth2/token", server.uri()),
        "test-client",
        SecretString::from("test-secret"),
    );
    config.connect_timeout = Duration::from_secs(1);
    config.request_timeout = Duration::from_secs(2);
    config
}

/// A directory client whose token cache targets the same mock server.
pub fn directory_client(server: &MockServer) -> DirectoryClient {
    let config = provider_config(server);
    let http_client = reqwest::Client::new();
    let tokens = Arc::new(TokenCache::new(config, http_client.clone()));
    DirectoryClient::with_parts("helloasso", server.uri(), http_client, tokens)
}

/// Mount the token endpoint returning `token` with the given lifetime,
/// expecting exactly `expected_calls` grants.
pub async fn mount_token_endpoint(
    server: &MockServer,
    token: &str,
    expires_in: u64,
    expected_calls: u64,
) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=test-client"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": token,
            "expires_in": expires_in,
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// JSON body for one directory search page.
pub fn search_page_json(
    names_and_slugs: &[(&str, &str)],
    page_index: u32,
    total_pages: u32,
    total_count: u32,
) -> serde_json::Value {
    let data: Vec<serde_json::Value> = names_and_slugs
        .iter()
        .map(|(name, slug)| {
            json!({
                "name": name,
                "slug": slug,
                "city": "Lyon",
                "zipCode": "69001",
                "category": "Danse",
            })
        })
        .collect();
    json!({
        "data": data,
        "pagination": {
            "pageIndex": page_index,
            "pageSize": 20,
            "totalCount": total_count,
            "totalPages": total_pages,
        }
    })
}
