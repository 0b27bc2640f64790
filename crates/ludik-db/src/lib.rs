//! Database layer for ludik — Postgres models and queries via sqlx.

pub mod error;
pub mod models;

pub use error::{DbError, DbResult};
pub use models::association::{
    Association, AssociationCategory, AssociationStatus, DirectoryFields,
};
pub use models::subscription::{Subscription, SubscriptionStatus};
