//! Directory reconciliation for ludik.
//!
//! Takes the stream of remote organization records produced by
//! `ludik-directory` and reconciles it against the local association store
//! with idempotent, change-detecting upserts. The [`SyncOrchestrator`]
//! drives full-area and single-organization syncs and reports totals.

pub mod category;
pub mod engine;
pub mod error;
pub mod orchestrator;
pub mod report;
pub mod store;
pub mod testing;

pub use engine::{ReconciliationEngine, UpsertOutcome};
pub use error::{SyncError, SyncOpResult};
pub use orchestrator::SyncOrchestrator;
pub use report::SyncReport;
pub use store::{AssociationStore, PgAssociationStore};
