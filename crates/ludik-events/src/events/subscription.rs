//! Subscription lifecycle events.

use crate::event::Event;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Emitted once per subscription expired by the expiry job, after the
/// enclosing chunk has committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionExpired {
    pub subscription_id: Uuid,
    pub user_id: Uuid,
    pub family_id: Uuid,
    pub family_member_id: Uuid,
    pub association_id: Uuid,
    pub activity_id: Uuid,
    pub expired_at: DateTime<Utc>,
}

impl Event for SubscriptionExpired {
    const TOPIC: &'static str = "ludik.subscription";
    const EVENT_TYPE: &'static str = "ludik.subscription.expired";
}
