//! Job identity and lifecycle status.

use std::fmt;

/// The kinds of batch job this workspace runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    DirectorySync,
    SubscriptionExpiry,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectorySync => write!(f, "directory_sync"),
            Self::SubscriptionExpiry => write!(f, "subscription_expiry"),
        }
    }
}

/// Lifecycle of one job run as tracked by the launcher:
/// STARTING → RUNNING → COMPLETED | FAILED.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Accepted by the launcher; the task body has not begun yet.
    Starting,
    Running,
    Completed,
    Failed(String),
}

impl JobStatus {
    /// Whether the run has finished, successfully or not.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed(_))
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Starting => write!(f, "starting"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}
