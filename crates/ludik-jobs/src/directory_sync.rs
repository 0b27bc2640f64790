//! Nightly directory sync job.
//!
//! Pages each configured area through the Provider, reconciling records
//! one chunk (one Provider page) at a time. Page fetches are retried with
//! exponential backoff; a transient failure that survives the retry
//! budget costs one skip instead of the whole run. Fatal errors, database
//! errors included, abort immediately.

use crate::error::JobResult;
use crate::skip::SkipTracker;
use ludik_directory::RetryPolicy;
use ludik_sync::{AssociationStore, SyncOrchestrator, SyncReport};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

pub struct DirectorySyncJob<S> {
    orchestrator: Arc<SyncOrchestrator<S>>,
    areas: Vec<String>,
    retry: RetryPolicy,
    skip_limit: u32,
}

impl<S: AssociationStore> DirectorySyncJob<S> {
    pub fn new(
        orchestrator: Arc<SyncOrchestrator<S>>,
        areas: Vec<String>,
        retry: RetryPolicy,
        skip_limit: u32,
    ) -> Self {
        Self {
            orchestrator,
            areas,
            retry,
            skip_limit,
        }
    }

    /// Run the sync to completion over every configured area.
    ///
    /// The returned report counts only successfully reconciled records;
    /// skipped pages and records are logged and tallied separately. The
    /// completion event is published whether or not anything was skipped.
    #[instrument(skip(self), fields(areas = self.areas.len()))]
    pub async fn run(&self) -> JobResult<SyncReport> {
        let started = Instant::now();
        let mut report = SyncReport::empty();
        let mut skips = SkipTracker::new(self.skip_limit);
        let client = self.orchestrator.client();
        let page_size = self.orchestrator.page_size();

        for area in &self.areas {
            let mut page_index = 0u32;
            loop {
                let fetched = self
                    .retry
                    .execute("directory.search", || {
                        client.search_organizations(area, page_index, page_size)
                    })
                    .await;

                let page = match fetched {
                    Ok(page) => page,
                    Err(e) if e.is_transient() => {
                        skips.record(&format!("{area} page {page_index}"), &e)?;
                        page_index += 1;
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                };

                if page.data.is_empty() {
                    break;
                }

                for record in &page.data {
                    match self.orchestrator.reconcile_record(record).await {
                        Ok(outcome) => report.record(outcome),
                        Err(e) if e.is_transient() => {
                            let label = record.slug.as_deref().unwrap_or(&record.name);
                            skips.record(&format!("{area} record {label}"), &e)?;
                        }
                        Err(e) => return Err(e.into()),
                    }
                }

                if !page.pagination.has_more() {
                    break;
                }
                page_index += 1;
            }
        }

        report.finish(started.elapsed());
        if skips.skipped() > 0 {
            warn!(skipped = skips.skipped(), "Directory sync completed with skips");
        }
        info!(
            created = report.created,
            updated = report.updated,
            unchanged = report.unchanged,
            total = report.total_processed(),
            skipped = skips.skipped(),
            duration_ms = report.duration.as_millis() as u64,
            "Directory sync job finished"
        );

        self.orchestrator.publish_report(&report);
        Ok(report)
    }
}
