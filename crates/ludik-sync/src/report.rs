//! Aggregated result of one sync invocation.

use crate::engine::UpsertOutcome;
use chrono::{DateTime, Utc};
use ludik_events::DirectorySyncCompleted;
use std::time::Duration;

/// Counts and timing for one sync run. Immutable once returned to the
/// caller; embedded in the completion event.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub created: u32,
    pub updated: u32,
    pub unchanged: u32,
    pub synced_at: DateTime<Utc>,
    pub duration: Duration,
}

impl SyncReport {
    pub fn empty() -> Self {
        Self {
            created: 0,
            updated: 0,
            unchanged: 0,
            synced_at: Utc::now(),
            duration: Duration::ZERO,
        }
    }

    pub fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Created => self.created += 1,
            UpsertOutcome::Updated => self.updated += 1,
            UpsertOutcome::Unchanged => self.unchanged += 1,
        }
    }

    pub fn finish(&mut self, elapsed: Duration) {
        self.synced_at = Utc::now();
        self.duration = elapsed;
    }

    /// Total records processed: the sum of the per-outcome counts.
    pub fn total_processed(&self) -> u32 {
        self.created + self.updated + self.unchanged
    }

    /// Build the completion event payload.
    pub fn to_event(&self) -> DirectorySyncCompleted {
        DirectorySyncCompleted {
            created: self.created,
            updated: self.updated,
            unchanged: self.unchanged,
            total_processed: self.total_processed(),
            synced_at: self.synced_at,
            duration_ms: self.duration.as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_are_sum_of_outcomes() {
        let mut report = SyncReport::empty();
        report.record(UpsertOutcome::Created);
        report.record(UpsertOutcome::Created);
        report.record(UpsertOutcome::Updated);
        report.record(UpsertOutcome::Unchanged);
        report.finish(Duration::from_millis(1234));

        assert_eq!(report.created, 2);
        assert_eq!(report.updated, 1);
        assert_eq!(report.unchanged, 1);
        assert_eq!(report.total_processed(), 4);

        let event = report.to_event();
        assert_eq!(event.total_processed, 4);
        assert_eq!(event.duration_ms, 1234);
    }
}
