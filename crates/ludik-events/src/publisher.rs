//! Best-effort event publisher over a tokio broadcast channel.

use crate::envelope::{EventEnvelope, PublishedEvent};
use crate::event::Event;

/// Publisher that fans events out to in-process subscribers.
///
/// Publishing is fire-and-forget: serialization problems and the absence
/// of subscribers are logged and discarded, never propagated. The work
/// that produced the event has already completed and must not be failed
/// by the event path.
#[derive(Clone)]
pub struct EventPublisher {
    sender: tokio::sync::broadcast::Sender<PublishedEvent>,
}

impl EventPublisher {
    /// Create a publisher with the given channel capacity.
    pub fn new(capacity: usize) -> (Self, tokio::sync::broadcast::Receiver<PublishedEvent>) {
        let (sender, receiver) = tokio::sync::broadcast::channel(capacity);
        (Self { sender }, receiver)
    }

    /// Publish a payload to all subscribers.
    pub fn publish<T: Event>(&self, payload: T) {
        let envelope = EventEnvelope::new(payload);
        let event_type = envelope.event_type.clone();

        let published = match envelope.into_published() {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(event_type = %event_type, error = %e, "Dropping unserializable event");
                return;
            }
        };

        if let Err(e) = self.sender.send(published) {
            tracing::warn!(event_type = %event_type, error = %e, "No active subscribers to receive event");
        }
    }

    /// Get a new receiver for the broadcast channel.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<PublishedEvent> {
        self.sender.subscribe()
    }
}
