//! Subscription model — a family member's enrollment in an activity.
//!
//! The expiry job is the only writer in this workspace: it flips ACTIVE
//! rows whose `end_date` has passed to EXPIRED and stamps `expired_at`.
//! Invariant: `expired_at` is non-null exactly when status is `expired`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use uuid::Uuid;

/// Lifecycle status of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Pending,
    Active,
    Expired,
    Cancelled,
}

impl SubscriptionStatus {
    /// Check if this status is terminal (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Expired | Self::Cancelled)
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Active => write!(f, "active"),
            Self::Expired => write!(f, "expired"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for SubscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "expired" => Ok(Self::Expired),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown subscription status: {s}")),
        }
    }
}

/// A subscription row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub family_id: Uuid,
    pub family_member_id: Uuid,
    pub association_id: Uuid,
    pub activity_id: Uuid,
    pub status: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub expired_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Get the status enum.
    pub fn status(&self) -> SubscriptionStatus {
        self.status.parse().unwrap_or(SubscriptionStatus::Pending)
    }

    /// Load the stable snapshot the expiry job works from: all ACTIVE
    /// subscriptions whose `end_date` is strictly before `cutoff`, ordered
    /// by `end_date` ascending for deterministic processing.
    pub async fn list_due_for_expiry(
        pool: &PgPool,
        cutoff: NaiveDate,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT * FROM subscriptions
            WHERE status = 'active' AND end_date < $1
            ORDER BY end_date ASC, id ASC
            "#,
        )
        .bind(cutoff)
        .fetch_all(pool)
        .await
    }

    /// Expire one chunk of subscriptions in a single atomic statement.
    ///
    /// Only rows still ACTIVE are touched, so a re-run over the same ids is
    /// a no-op. Returns the ids of the rows actually expired; a row that
    /// left ACTIVE between snapshot and update is absent from the result.
    pub async fn expire_chunk(
        pool: &PgPool,
        ids: &[Uuid],
        expired_at: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            UPDATE subscriptions
            SET status = 'expired',
                expired_at = $2,
                updated_at = NOW()
            WHERE id = ANY($1) AND status = 'active'
            RETURNING id
            "#,
        )
        .bind(ids)
        .bind(expired_at)
        .fetch_all(pool)
        .await
    }
}
