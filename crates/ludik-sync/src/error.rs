//! Sync error types.

use ludik_db::DbError;
use ludik_directory::DirectoryError;
use thiserror::Error;

/// Errors that can occur during reconciliation and orchestration.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Provider-side failure, propagated unmodified from the directory
    /// layer so the batch layer can apply its retry/skip policy.
    #[error("Provider error: {0}")]
    Directory(#[from] DirectoryError),

    /// Local store failure. Never transient: a broken local database is a
    /// real problem, not a condition to skip past.
    #[error("Store error: {0}")]
    Db(#[from] DbError),
}

impl SyncError {
    /// Whether this error is a transient external failure eligible for the
    /// batch layer's retry and skip budgets.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Directory(e) => e.is_transient(),
            Self::Db(_) => false,
        }
    }
}

/// Result type for sync operations.
pub type SyncOpResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let api = SyncError::from(DirectoryError::api("helloasso", 502, "bad gateway"));
        assert!(api.is_transient());

        let malformed = SyncError::from(DirectoryError::malformed("helloasso", "not json"));
        assert!(!malformed.is_transient());

        let db = SyncError::from(DbError::not_found("association", "x"));
        assert!(!db.is_transient());
    }
}
