//! Event trait definition for type-safe event publishing.

use serde::{de::DeserializeOwned, Serialize};

/// Trait for types that can be published as domain events.
///
/// Implementors define the bus topic and event type name; the payload is
/// serialized as JSON inside an envelope.
///
/// Convention for `EVENT_TYPE`: `ludik.<entity>.<action>`.
pub trait Event: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The bus topic for this event type.
    const TOPIC: &'static str;

    /// The fully qualified event type name, stored in the envelope for
    /// routing and deserialization.
    const EVENT_TYPE: &'static str;
}
