//! Typed domain events for ludik.
//!
//! Events are concrete payload structs implementing the [`Event`] trait,
//! wrapped in an [`EventEnvelope`] carrying the type discriminator and
//! metadata. The [`EventPublisher`] is a best-effort, fire-and-forget
//! boundary: the bus transport that fans events out to other services
//! lives elsewhere.

pub mod envelope;
pub mod error;
pub mod event;
pub mod events;
pub mod publisher;

pub use envelope::{EventEnvelope, PublishedEvent};
pub use error::EventError;
pub use event::Event;
pub use events::directory::DirectorySyncCompleted;
pub use events::subscription::SubscriptionExpired;
pub use publisher::EventPublisher;
