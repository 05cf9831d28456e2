use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use loyalty_core::EventId;

/// Envelope for a message travelling over the bus.
///
/// This is the unit you publish/deliver.
///
/// Notes:
/// - `event_id` identifies the *delivery subject*: a redelivery of the same
///   message carries the same id, which is what consumers de-duplicate on.
/// - `topic` names the stream the message belongs to (e.g. "member", "order").
/// - `payload` is the domain payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: EventId,
    topic: String,
    published_at: DateTime<Utc>,
    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        event_id: EventId,
        topic: impl Into<String>,
        published_at: DateTime<Utc>,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            topic: topic.into(),
            published_at,
            payload,
        }
    }

    /// Wrap a payload with a fresh id, published now.
    pub fn wrap(topic: impl Into<String>, payload: E) -> Self {
        Self::new(EventId::new(), topic, Utc::now(), payload)
    }

    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}
