//! Directory synchronization events.

use crate::event::Event;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Emitted once per completed directory sync run with the aggregate counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorySyncCompleted {
    pub created: u32,
    pub updated: u32,
    pub unchanged: u32,
    pub total_processed: u32,
    pub synced_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl Event for DirectorySyncCompleted {
    const TOPIC: &'static str = "ludik.directory";
    const EVENT_TYPE: &'static str = "ludik.directory.sync.completed";
}
