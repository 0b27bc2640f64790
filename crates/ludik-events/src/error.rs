//! Event layer errors.

use thiserror::Error;

/// Errors from envelope handling.
#[derive(Debug, Error)]
pub enum EventError {
    /// Payload could not be serialized to JSON.
    #[error("Failed to serialize event {event_type}: {cause}")]
    SerializationFailed { event_type: String, cause: String },

    /// Envelope bytes could not be deserialized.
    #[error("Failed to deserialize event {event_type}: {cause}")]
    DeserializationFailed { event_type: String, cause: String },

    /// Envelope metadata is structurally invalid.
    #[error("Invalid event envelope: {reason}")]
    InvalidEnvelope { reason: String },
}
