//! Job error types.

use crate::status::JobKind;
use ludik_db::DbError;
use ludik_directory::DirectoryError;
use ludik_sync::SyncError;
use thiserror::Error;

/// Errors terminating a batch job run.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("Sync failed: {0}")]
    Sync(#[from] SyncError),

    #[error("Database failure: {0}")]
    Db(#[from] DbError),

    /// Too many transient failures were skipped; the run is abandoned
    /// rather than silently producing a mostly-empty sync.
    #[error("Skip limit exceeded: {skipped} skips over a limit of {limit}")]
    SkipLimitExceeded { skipped: u32, limit: u32 },

    /// A run of the same kind is already in flight.
    #[error("A {kind} job is already running")]
    AlreadyRunning { kind: JobKind },

    #[error("Job task panicked: {0}")]
    Panicked(String),
}

impl From<DirectoryError> for JobError {
    fn from(e: DirectoryError) -> Self {
        Self::Sync(e.into())
    }
}

/// Result type for job operations.
pub type JobResult<T> = Result<T, JobError>;
