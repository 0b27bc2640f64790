//! Shared helpers for orchestrator tests: a mock Provider plus an
//! in-memory association store.

#![allow(dead_code)]

use ludik_directory::{DirectoryClient, ProviderConfig, TokenCache};
use ludik_sync::testing::InMemoryAssociationStore;
use ludik_sync::{ReconciliationEngine, SyncOrchestrator};
use secrecy::SecretString;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const PAGE_SIZE: u32 = 20;

/// Orchestrator over a fresh in-memory store, pointed at a mock Provider.
pub fn orchestrator(
    server: &MockServer,
    store: InMemoryAssociationStore,
) -> SyncOrchestrator<InMemoryAssociationStore> {
    let mut config = ProviderConfig::new(
        "helloasso",
        server.uri(),
        format!("{}/oauth2/token", server.uri()),
        "test-client",
        SecretString::from("test-secret"),
    );
    config.connect_timeout = Duration::from_secs(1);
    config.request_timeout = Duration::from_secs(2);

    let http_client = reqwest::Client::new();
    let tokens = Arc::new(TokenCache::new(config, http_client.clone()));
    let client = DirectoryClient::with_parts("helloasso", server.uri(), http_client, tokens);

    SyncOrchestrator::new(client, ReconciliationEngine::new(store), PAGE_SIZE)
}

/// Mount a token endpoint handing out one long-lived token.
pub async fn mount_token_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-token",
            "expires_in": 3600,
        })))
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
            "pageSize": PAGE_SIZE,
            "totalCount": total_count,
            "totalPages": total_pages,
        }
    })
}
