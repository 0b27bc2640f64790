//! Store seam between the reconciliation engine and the database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ludik_db::{Association, DbError, DirectoryFields};
use sqlx::PgPool;
use uuid::Uuid;

/// The persistence operations the reconciliation engine needs.
///
/// Implemented by [`PgAssociationStore`] in production and by an
/// in-memory store in tests.
#[async_trait]
pub trait AssociationStore: Send + Sync {
    /// Look up an association by its Provider slug.
    async fn find_by_provider_slug(&self, slug: &str) -> Result<Option<Association>, DbError>;

    /// Insert a new association from directory fields, status active,
    /// `last_synced_at` set to `synced_at`.
    async fn insert_synced(
        &self,
        slug: &str,
        fields: &DirectoryFields,
        synced_at: DateTime<Utc>,
    ) -> Result<Association, DbError>;

    /// Overwrite the directory fields of an existing association and
    /// advance `last_synced_at`.
    async fn update_synced(
        &self,
        id: Uuid,
        fields: &DirectoryFields,
        synced_at: DateTime<Utc>,
    ) -> Result<Association, DbError>;
}

/// Postgres-backed association store.
#[derive(Clone)]
pub struct PgAssociationStore {
    pool: PgPool,
}

impl PgAssociationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssociationStore for PgAssociationStore {
    async fn find_by_provider_slug(&self, slug: &str) -> Result<Option<Association>, DbError> {
        Ok(Association::find_by_provider_slug(&self.pool, slug).await?)
    }

    async fn insert_synced(
        &self,
        slug: &str,
        fields: &DirectoryFields,
        synced_at: DateTime<Utc>,
    ) -> Result<Association, DbError> {
        Ok(Association::insert_synced(&self.pool, slug, fields, synced_at).await?)
    }

    async fn update_synced(
        &self,
        id: Uuid,
        fields: &DirectoryFields,
        synced_at: DateTime<Utc>,
    ) -> Result<Association, DbError> {
        Ok(Association::update_synced(&self.pool, id, fields, synced_at).await?)
    }
}
