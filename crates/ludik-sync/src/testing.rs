//! In-memory association store for unit and integration tests.

use crate::store::AssociationStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ludik_db::{Association, DbError, DirectoryFields};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Map-backed [`AssociationStore`] keyed by Provider slug.
///
/// Cloning shares the underlying map, so a test can keep a handle for
/// assertions while the engine owns another.
#[derive(Clone, Default)]
pub struct InMemoryAssociationStore {
    rows: Arc<Mutex<HashMap<String, Association>>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryAssociationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored associations.
    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    /// Fetch a stored association by slug.
    pub async fn get(&self, slug: &str) -> Option<Association> {
        self.rows.lock().await.get(slug).cloned()
    }

    /// Overwrite the moderation status of a stored association.
    pub async fn set_status(&self, slug: &str, status: &str) {
        if let Some(row) = self.rows.lock().await.get_mut(slug) {
            status.clone_into(&mut row.status);
        }
    }

    /// Make every subsequent write fail with a database error, simulating
    /// a lost connection.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    fn write_error() -> DbError {
        DbError::Database(sqlx::Error::PoolClosed)
    }

    fn build(slug: &str, fields: &DirectoryFields, synced_at: DateTime<Utc>) -> Association {
        let now = Utc::now();
        Association {
            id: Uuid::new_v4(),
            provider_slug: Some(slug.to_string()),
            name: fields.name.clone(),
            description: fields.description.clone(),
            city: fields.city.clone(),
            postal_code: fields.postal_code.clone(),
            department: fields.department.clone(),
            region: fields.region.clone(),
            website: fields.website.clone(),
            logo_url: fields.logo_url.clone(),
            category: fields.category.to_string(),
            status: "active".to_string(),
            last_synced_at: Some(synced_at),
            created_at: now,
            updated_at: now,
        }
    }
}

#[async_trait]
impl AssociationStore for InMemoryAssociationStore {
    async fn find_by_provider_slug(&self, slug: &str) -> Result<Option<Association>, DbError> {
        Ok(self.rows.lock().await.get(slug).cloned())
    }

    async fn insert_synced(
        &self,
        slug: &str,
        fields: &DirectoryFields,
        synced_at: DateTime<Utc>,
    ) -> Result<Association, DbError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::write_error());
        }
        let row = Self::build(slug, fields, synced_at);
        self.rows
            .lock()
            .await
            .insert(slug.to_string(), row.clone());
        Ok(row)
    }

    async fn update_synced(
        &self,
        id: Uuid,
        fields: &DirectoryFields,
        synced_at: DateTime<Utc>,
    ) -> Result<Association, DbError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::write_error());
        }
        let mut rows = self.rows.lock().await;
        let row = rows
            .values_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| DbError::not_found("association", id.to_string()))?;

        fields.name.clone_into(&mut row.name);
        row.description.clone_from(&fields.description);
        row.city.clone_from(&fields.city);
        row.postal_code.clone_from(&fields.postal_code);
        row.department.clone_from(&fields.department);
        row.region.clone_from(&fields.region);
        row.website.clone_from(&fields.website);
        row.logo_url.clone_from(&fields.logo_url);
        row.category = fields.category.to_string();
        row.last_synced_at = Some(synced_at);
        row.updated_at = Utc::now();
        Ok(row.clone())
    }
}
