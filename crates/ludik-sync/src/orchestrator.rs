//! Orchestration of full-directory and single-organization syncs.

use crate::engine::{ReconciliationEngine, UpsertOutcome};
use crate::error::SyncOpResult;
use crate::report::SyncReport;
use crate::store::AssociationStore;
use ludik_directory::{DirectoryClient, DirectoryPage};
use ludik_events::EventPublisher;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Drives the directory sync: pages each configured area through the
/// [`DirectoryClient`], feeds every record to the [`ReconciliationEngine`],
/// aggregates totals, and emits a best-effort completion event.
pub struct SyncOrchestrator<S> {
    client: DirectoryClient,
    engine: ReconciliationEngine<S>,
    publisher: Option<EventPublisher>,
    page_size: u32,
}

impl<S: AssociationStore> SyncOrchestrator<S> {
    pub fn new(client: DirectoryClient, engine: ReconciliationEngine<S>, page_size: u32) -> Self {
        Self {
            client,
            engine,
            publisher: None,
            page_size,
        }
    }

    /// Attach an event publisher for completion events.
    #[must_use]
    pub fn with_publisher(mut self, publisher: EventPublisher) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// The Provider page size, which the batch layer uses as its chunk size.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// The underlying directory client, for callers that wrap fetches in
    /// their own retry policy.
    pub fn client(&self) -> &DirectoryClient {
        &self.client
    }

    /// Fetch one directory page for an area.
    pub async fn fetch_page(&self, area: &str, page_index: u32) -> SyncOpResult<DirectoryPage> {
        Ok(self
            .client
            .search_organizations(area, page_index, self.page_size)
            .await?)
    }

    /// Reconcile one remote record through the engine.
    pub async fn reconcile_record(
        &self,
        record: &ludik_directory::RemoteOrganization,
    ) -> SyncOpResult<UpsertOutcome> {
        self.engine.reconcile(record).await
    }

    /// Sync every configured area, in order.
    ///
    /// Pagination per area starts at index 0 and stops as soon as an empty
    /// page or the Provider's reported last page is seen; an empty first
    /// page is not an error. After all areas are drained a completion
    /// event is published best-effort — the sync's success is independent
    /// of the event bus.
    #[instrument(skip(self), fields(areas = areas.len()))]
    pub async fn sync_all(&self, areas: &[String]) -> SyncOpResult<SyncReport> {
        let started = Instant::now();
        let mut report = SyncReport::empty();

        for area in areas {
            let mut page_index = 0u32;
            loop {
                let page = self.fetch_page(area, page_index).await?;
                if page.data.is_empty() {
                    debug!(area, page_index, "Empty page, area drained");
                    break;
                }

                debug!(area, page_index, records = page.data.len(), "Reconciling page");
                for record in &page.data {
                    let outcome = self.engine.reconcile(record).await?;
                    report.record(outcome);
                }

                if !page.pagination.has_more() {
                    break;
                }
                page_index += 1;
            }
        }

        report.finish(started.elapsed());
        info!(
            created = report.created,
            updated = report.updated,
            unchanged = report.unchanged,
            total = report.total_processed(),
            duration_ms = report.duration.as_millis() as u64,
            "Directory sync completed"
        );

        self.publish_report(&report);
        Ok(report)
    }

    /// Sync a single organization by slug.
    ///
    /// The caller explicitly asked for this organization, so a missing or
    /// empty Provider response is surfaced as an error rather than being
    /// silently skipped.
    #[instrument(skip(self))]
    pub async fn sync_one(&self, slug: &str) -> SyncOpResult<SyncReport> {
        let started = Instant::now();
        let record = self.client.get_organization(slug).await?;

        let mut report = SyncReport::empty();
        report.record(self.engine.reconcile(&record).await?);
        report.finish(started.elapsed());

        info!(slug, total = report.total_processed(), "Single-organization sync completed");
        Ok(report)
    }

    /// Publish the completion event. Best-effort: the publisher logs and
    /// discards failures internally, so the sync result is never affected.
    pub fn publish_report(&self, report: &SyncReport) {
        if let Some(ref publisher) = self.publisher {
            publisher.publish(report.to_event());
        }
    }
}
