//! Directory client behavior: bearer attachment, pagination parsing,
//! error mapping, 401 invalidation, and the empty-body edge case.

mod common;

use common::{directory_client, mount_token_endpoint, search_page_json};
use ludik_directory::DirectoryError;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_search_attaches_bearer_and_parses_page() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, "tok-abc", 3600, 1).await;

    Mock::given(method("GET"))
        .and(path("/organizations"))
        .and(header("Authorization", "Bearer tok-abc"))
        .and(query_param("city", "Lyon"))
        .and(query_param("pageIndex", "0"))
        .and(query_param("pageSize", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page_json(
            &[("Club de Danse", "club-danse-paris"), ("Judo Club", "judo-club-lyon")],
            0,
            1,
            2,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = directory_client(&server);
    let page = client.search_organizations("Lyon", 0, 20).await.unwrap();

    assert_eq!(page.data.len(), 2);
    assert_eq!(page.data[0].slug.as_deref(), Some("club-danse-paris"));
    assert_eq!(page.pagination.total_count, 2);
    assert!(!page.pagination.has_more());
}

#[tokio::test]
async fn test_search_server_error_is_transient_api_error() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, "tok", 3600, 1).await;

    Mock::given(method("GET"))
        .and(path("/organizations"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let client = directory_client(&server);
    let error = client.search_organizations("Lyon", 0, 20).await.unwrap_err();

    match &error {
        DirectoryError::Api {
            provider,
            status,
            detail,
        } => {
            assert_eq!(provider, "helloasso");
            assert_eq!(*status, 503);
            assert!(detail.contains("maintenance"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert!(error.is_transient());
}

#[tokio::test]
async fn test_unauthorized_invalidates_cached_token() {
    let server = MockServer::start().await;
    // One grant for the failing search, a second after invalidation.
    mount_token_endpoint(&server, "tok", 3600, 2).await;

    Mock::given(method("GET"))
        .and(path("/organizations"))
        .respond_with(ResponseTemplate::new(401).set_body_string("expired"))
        .mount(&server)
        .await;

    let client = directory_client(&server);

    let error = client.search_organizations("Lyon", 0, 20).await.unwrap_err();
    assert!(matches!(error, DirectoryError::Api { status: 401, .. }));

    // The cached token was dropped: this current() performs a fresh grant.
    client.tokens().current().await.unwrap();
}

#[tokio::test]
async fn test_get_organization_success() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, "tok", 3600, 1).await;

    Mock::given(method("GET"))
        .and(path("/organizations/club-danse-paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Club de Danse",
            "slug": "club-danse-paris",
            "city": "Paris",
            "zipCode": "75011",
            "category": "Danse",
        })))
        .mount(&server)
        .await;

    let client = directory_client(&server);
    let record = client.get_organization("club-danse-paris").await.unwrap();

    assert_eq!(record.name, "Club de Danse");
    assert_eq!(record.city.as_deref(), Some("Paris"));
}

#[tokio::test]
async fn test_get_organization_empty_body_is_distinct_error() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, "tok", 3600, 1).await;

    Mock::given(method("GET"))
        .and(path("/organizations/ghost-club"))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .mount(&server)
        .await;

    let client = directory_client(&server);
    let error = client.get_organization("ghost-club").await.unwrap_err();

    match &error {
        DirectoryError::EmptyResponse { provider, slug } => {
            assert_eq!(provider, "helloasso");
            assert_eq!(slug, "ghost-club");
        }
        other => panic!("expected EmptyResponse, got {other:?}"),
    }
    // Structurally bad payload: not eligible for retry/skip budgets.
    assert!(!error.is_transient());
}

#[tokio::test]
async fn test_get_organization_malformed_body() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, "tok", 3600, 1).await;

    Mock::given(method("GET"))
        .and(path("/organizations/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[not an object]"))
        .mount(&server)
        .await;

    let client = directory_client(&server);
    let error = client.get_organization("broken").await.unwrap_err();
    assert!(matches!(error, DirectoryError::Malformed { .. }));
}
