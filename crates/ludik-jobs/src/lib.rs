//! Batch jobs for ludik: the nightly directory sync and the subscription
//! expiry sweep, plus the launcher and scheduler that run them.
//!
//! Jobs process their input in chunks sized to the Provider page size.
//! The directory sync tolerates a bounded number of transient failures
//! before giving up; the expiry sweep treats every database error as
//! fatal because it is the system of record.

pub mod directory_sync;
pub mod error;
pub mod launcher;
pub mod scheduler;
pub mod skip;
pub mod status;
pub mod subscription_expiry;

pub use directory_sync::DirectorySyncJob;
pub use error::{JobError, JobResult};
pub use launcher::{JobHandle, JobLauncher};
pub use scheduler::{JobScheduler, ScheduleTime};
pub use skip::SkipTracker;
pub use status::{JobKind, JobStatus};
pub use subscription_expiry::{
    ExpiryReport, PgSubscriptionStore, SubscriptionExpiryJob, SubscriptionStore,
};
