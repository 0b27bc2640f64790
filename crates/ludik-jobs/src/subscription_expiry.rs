//! Subscription expiry sweep.
//!
//! Flips ACTIVE subscriptions whose `end_date` has passed to EXPIRED, in
//! chunks, each chunk a single atomic statement. The cutoff date is fixed
//! once at job start so a run that crosses midnight stays consistent.
//! There is no skip budget here: every error is a database error, and a
//! database error is fatal.

use crate::error::JobResult;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use ludik_db::{DbError, Subscription};
use ludik_events::{EventPublisher, SubscriptionExpired};
use sqlx::PgPool;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Storage operations the expiry job needs.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// All ACTIVE subscriptions with `end_date` strictly before `cutoff`,
    /// ordered by `end_date` ascending.
    async fn list_due(&self, cutoff: NaiveDate) -> Result<Vec<Subscription>, DbError>;

    /// Atomically expire the still-ACTIVE rows among `ids`, returning the
    /// ids of the rows actually changed.
    async fn expire_chunk(
        &self,
        ids: &[Uuid],
        expired_at: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, DbError>;
}

/// Postgres-backed store.
pub struct PgSubscriptionStore {
    pool: PgPool,
}

impl PgSubscriptionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionStore for PgSubscriptionStore {
    async fn list_due(&self, cutoff: NaiveDate) -> Result<Vec<Subscription>, DbError> {
        Ok(Subscription::list_due_for_expiry(&self.pool, cutoff).await?)
    }

    async fn expire_chunk(
        &self,
        ids: &[Uuid],
        expired_at: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, DbError> {
        Ok(Subscription::expire_chunk(&self.pool, ids, expired_at).await?)
    }
}

/// Result of one expiry run.
#[derive(Debug, Clone)]
pub struct ExpiryReport {
    /// Subscriptions in the due snapshot at job start.
    pub examined: usize,
    /// Rows actually flipped to EXPIRED.
    pub expired: u64,
    /// Chunks processed.
    pub chunks: u32,
    /// The fixed cutoff date used for the whole run.
    pub cutoff: NaiveDate,
    pub duration: Duration,
}

pub struct SubscriptionExpiryJob<S> {
    store: S,
    publisher: Option<EventPublisher>,
    chunk_size: usize,
}

impl<S: SubscriptionStore> SubscriptionExpiryJob<S> {
    pub fn new(store: S, chunk_size: usize) -> Self {
        Self {
            store,
            publisher: None,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Attach an event publisher for per-subscription expiry events.
    #[must_use]
    pub fn with_publisher(mut self, publisher: EventPublisher) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Run the sweep to completion.
    ///
    /// The due set is snapshotted once and walked in chunks. Each chunk is
    /// one atomic update touching only rows still ACTIVE, so a crashed or
    /// repeated run never double-expires. Events go out after the chunk's
    /// update has committed, one per expired subscription, best-effort.
    #[instrument(skip(self))]
    pub async fn run(&self) -> JobResult<ExpiryReport> {
        let started = Instant::now();
        let cutoff = Utc::now().date_naive();

        let due = self.store.list_due(cutoff).await?;
        info!(cutoff = %cutoff, due = due.len(), "Subscription expiry sweep starting");

        let mut expired: u64 = 0;
        let mut chunks: u32 = 0;
        for chunk in due.chunks(self.chunk_size) {
            let expired_at = Utc::now();
            let ids: Vec<Uuid> = chunk.iter().map(|s| s.id).collect();

            let affected = self.store.expire_chunk(&ids, expired_at).await?;
            expired += affected.len() as u64;
            chunks += 1;
            debug!(
                chunk = chunks,
                size = ids.len(),
                affected = affected.len(),
                "Expired chunk"
            );

            self.publish_chunk(chunk, &affected, expired_at);
        }

        let report = ExpiryReport {
            examined: due.len(),
            expired,
            chunks,
            cutoff,
            duration: started.elapsed(),
        };
        info!(
            examined = report.examined,
            expired = report.expired,
            chunks = report.chunks,
            duration_ms = report.duration.as_millis() as u64,
            "Subscription expiry sweep finished"
        );
        Ok(report)
    }

    /// Emit one event per row the committed chunk actually expired. A row
    /// that left ACTIVE between snapshot and update gets no event.
    /// Best-effort; a deaf event bus never fails the sweep.
    fn publish_chunk(&self, chunk: &[Subscription], affected: &[Uuid], expired_at: DateTime<Utc>) {
        let Some(ref publisher) = self.publisher else {
            return;
        };
        for sub in chunk.iter().filter(|s| affected.contains(&s.id)) {
            publisher.publish(SubscriptionExpired {
                subscription_id: sub.id,
                user_id: sub.user_id,
                family_id: sub.family_id,
                family_member_id: sub.family_member_id,
                association_id: sub.association_id,
                activity_id: sub.activity_id,
                expired_at,
            });
        }
    }
}
