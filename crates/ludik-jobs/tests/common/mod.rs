//! Shared helpers for job tests: an in-memory subscription store and a
//! mock Provider wired into a sync orchestrator.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, Utc};
use ludik_db::{DbError, Subscription};
use ludik_directory::{DirectoryClient, ProviderConfig, TokenCache};
use ludik_jobs::SubscriptionStore;
use ludik_sync::testing::InMemoryAssociationStore;
use ludik_sync::{ReconciliationEngine, SyncOrchestrator};
use secrecy::SecretString;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const PAGE_SIZE: u32 = 20;

/// Vec-backed [`SubscriptionStore`]. Cloning shares the rows.
#[derive(Clone, Default)]
pub struct InMemorySubscriptionStore {
    rows: Arc<Mutex<Vec<Subscription>>>,
    fail: Arc<AtomicBool>,
    cancel_before_expire: Arc<Mutex<Option<Uuid>>>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, sub: Subscription) {
        self.rows.lock().await.push(sub);
    }

    pub async fn get(&self, id: Uuid) -> Option<Subscription> {
        self.rows.lock().await.iter().find(|s| s.id == id).cloned()
    }

    pub async fn all(&self) -> Vec<Subscription> {
        self.rows.lock().await.clone()
    }

    /// Make every subsequent call fail with a database error.
    pub fn fail(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Cancel this row right before the next `expire_chunk`, simulating a
    /// concurrent cancellation between snapshot and update.
    pub async fn cancel_before_expire(&self, id: Uuid) {
        *self.cancel_before_expire.lock().await = Some(id);
    }

    fn error() -> DbError {
        DbError::Database(sqlx::Error::PoolClosed)
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn list_due(&self, cutoff: NaiveDate) -> Result<Vec<Subscription>, DbError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Self::error());
        }
        let mut due: Vec<Subscription> = self
            .rows
            .lock()
            .await
            .iter()
            .filter(|s| s.status == "active" && s.end_date < cutoff)
            .cloned()
            .collect();
        due.sort_by(|a, b| a.end_date.cmp(&b.end_date).then(a.id.cmp(&b.id)));
        Ok(due)
    }

    async fn expire_chunk(
        &self,
        ids: &[Uuid],
        expired_at: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, DbError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Self::error());
        }
        let mut rows = self.rows.lock().await;
        if let Some(cancelled) = self.cancel_before_expire.lock().await.take() {
            if let Some(row) = rows.iter_mut().find(|r| r.id == cancelled) {
                if row.status == "active" {
                    row.status = "cancelled".to_string();
                }
            }
        }

        let mut affected = Vec::new();
        for row in rows.iter_mut() {
            if ids.contains(&row.id) && row.status == "active" {
                row.status = "expired".to_string();
                row.expired_at = Some(expired_at);
                row.updated_at = Utc::now();
                affected.push(row.id);
            }
        }
        Ok(affected)
    }
}

/// An active subscription ending `days_ago` days before today.
pub fn active_subscription(days_ago: u64) -> Subscription {
    let now = Utc::now();
    let today = now.date_naive();
    Subscription {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        family_id: Uuid::new_v4(),
        family_member_id: Uuid::new_v4(),
        association_id: Uuid::new_v4(),
        activity_id: Uuid::new_v4(),
        status: "active".to_string(),
        start_date: today.checked_sub_days(Days::new(days_ago + 365)).unwrap(),
        end_date: today.checked_sub_days(Days::new(days_ago)).unwrap(),
        expired_at: None,
        created_at: now,
        updated_at: now,
    }
}

/// Orchestrator over an in-memory association store, pointed at a mock
/// Provider with a long-lived token already mounted.
pub async fn orchestrator(
    server: &MockServer,
    store: InMemoryAssociationStore,
) -> SyncOrchestrator<InMemoryAssociationStore> {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-token",
            "expires_in": 3600,
        })))
        .mount(server)
        .await;

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
