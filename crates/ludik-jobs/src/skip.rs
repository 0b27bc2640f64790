//! Bounded tolerance for transient failures during a batch run.

use crate::error::{JobError, JobResult};
use tracing::warn;

/// Counts skipped work items against a fixed budget.
///
/// Each recorded skip is logged; once the count exceeds the limit the
/// tracker returns [`JobError::SkipLimitExceeded`] and the run must stop.
/// Skipped items are never counted in the run's success totals.
#[derive(Debug)]
pub struct SkipTracker {
    limit: u32,
    skipped: u32,
}

impl SkipTracker {
    pub fn new(limit: u32) -> Self {
        Self { limit, skipped: 0 }
    }

    /// Record one skip for `context`, caused by `error`.
    pub fn record(&mut self, context: &str, error: &dyn std::error::Error) -> JobResult<()> {
        self.skipped += 1;
        warn!(
            context,
            skipped = self.skipped,
            limit = self.limit,
            error = %error,
            "Skipping after transient failure"
        );

        if self.skipped > self.limit {
            Err(JobError::SkipLimitExceeded {
                skipped: self.skipped,
                limit: self.limit,
            })
        } else {
            Ok(())
        }
    }

    /// Number of skips recorded so far.
    pub fn skipped(&self) -> u32 {
        self.skipped
    }
}
