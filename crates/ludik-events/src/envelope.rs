//! Event envelope wrapping every published payload with metadata.

use crate::error::EventError;
use crate::event::Event;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Standard envelope wrapping all ludik events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope<T> {
    /// Unique identifier for this event instance.
    pub event_id: Uuid,

    /// Fully qualified event type name, e.g. "ludik.subscription.expired".
    pub event_type: String,

    /// Timestamp when the event was created.
    pub timestamp: DateTime<Utc>,

    /// The actual event payload.
    pub payload: T,
}

impl<T: Event> EventEnvelope<T> {
    /// Create a new envelope around a payload.
    pub fn new(payload: T) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type: T::EVENT_TYPE.to_string(),
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Get the bus topic for this event.
    pub fn topic(&self) -> &'static str {
        T::TOPIC
    }

    /// Serialize the envelope to JSON bytes.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, EventError> {
        serde_json::to_vec(self).map_err(|e| EventError::SerializationFailed {
            event_type: T::EVENT_TYPE.to_string(),
            cause: e.to_string(),
        })
    }

    /// Erase the payload type for transport through the publisher channel.
    pub fn into_published(self) -> Result<PublishedEvent, EventError> {
        let payload =
            serde_json::to_value(&self.payload).map_err(|e| EventError::SerializationFailed {
                event_type: T::EVENT_TYPE.to_string(),
                cause: e.to_string(),
            })?;
        Ok(PublishedEvent {
            event_id: self.event_id,
            event_type: self.event_type,
            topic: T::TOPIC.to_string(),
            timestamp: self.timestamp,
            payload,
        })
    }
}

/// Type-erased envelope as it travels through the publisher channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishedEvent {
    pub event_id: Uuid,
    pub event_type: String,
    pub topic: String,
    pub timestamp: DateTime<Utc>,
    pub payload: serde_json::Value,
}

impl PublishedEvent {
    /// Validate that required metadata is present and follows convention.
    pub fn validate(&self) -> Result<(), EventError> {
        if self.event_type.is_empty() {
            return Err(EventError::InvalidEnvelope {
                reason: "event_type is empty".to_string(),
            });
        }
        if !self.event_type.starts_with("ludik.") {
            return Err(EventError::InvalidEnvelope {
                reason: format!(
                    "event_type '{}' does not follow naming convention",
                    self.event_type
                ),
            });
        }
        Ok(())
    }

    /// Try to deserialize the payload into a concrete event type.
    pub fn into_typed<T: Event>(self) -> Result<EventEnvelope<T>, EventError> {
        let payload: T = serde_json::from_value(self.payload).map_err(|e| {
            EventError::DeserializationFailed {
                event_type: self.event_type.clone(),
                cause: e.to_string(),
            }
        })?;
        Ok(EventEnvelope {
            event_id: self.event_id,
            event_type: self.event_type,
            timestamp: self.timestamp,
            payload,
        })
    }
}
