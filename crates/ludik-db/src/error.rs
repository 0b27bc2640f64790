//! Database error types.

use thiserror::Error;

/// Errors surfaced by the persistence layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// Underlying sqlx/Postgres error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A row expected to exist was not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },
}

impl DbError {
    /// Create a not-found error.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
