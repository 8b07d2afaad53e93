use serde::de::{self, IgnoredAny, SeqAccess, Visitor};
use serde::ser::SerializeTuple;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// A single recorded interaction sample.
///
/// On the wire an event is an ordered tuple: `[timestamp, kind]` or
/// `[timestamp, kind, payload]`. The tuple shape is preserved on
/// re-serialization because block hashes are computed over it.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Capture time (client clock, integer).
    pub timestamp: i64,
    /// Event kind as recorded by the client (e.g. `keydown`, `paste`).
    pub kind: String,
    /// Optional kind-specific payload.
    pub payload: Option<Value>,
}

impl Event {
    /// Creates an event without payload.
    pub fn new(timestamp: i64, kind: impl Into<String>) -> Self {
        Self {
            timestamp,
            kind: kind.into(),
            payload: None,
        }
    }

    /// Creates an event carrying a payload.
    pub fn with_payload(timestamp: i64, kind: impl Into<String>, payload: Value) -> Self {
        Self {
            timestamp,
            kind: kind.into(),
            payload: Some(payload),
        }
    }
}

impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.payload.is_some() { 3 } else { 2 };
        let mut tuple = serializer.serialize_tuple(len)?;
        tuple.serialize_element(&self.timestamp)?;
        tuple.serialize_element(&self.kind)?;
        if let Some(payload) = &self.payload {
            tuple.serialize_element(payload)?;
        }
        tuple.end()
    }
}

struct EventVisitor;

impl<'de> Visitor<'de> for EventVisitor {
    type Value = Event;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an event tuple [timestamp, kind] or [timestamp, kind, payload]")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Event, A::Error> {
        let timestamp: i64 = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let kind: String = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;
        let payload: Option<Value> = seq.next_element()?;
        if seq.next_element::<IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_length(4, &self));
        }
        Ok(Event {
            timestamp,
            kind,
            payload,
        })
    }
}

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(EventVisitor)
    }
}

/// Flattened `(timestamp, kind)` view of an event, produced from a verified chain.
///
/// Serialized as a two-element tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEvent {
    /// Capture time.
    pub timestamp: i64,
    /// Event kind.
    pub kind: String,
}

impl From<&Event> for SessionEvent {
    fn from(event: &Event) -> Self {
        Self {
            timestamp: event.timestamp,
            kind: event.kind.clone(),
        }
    }
}

impl Serialize for SessionEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.timestamp, &self.kind).serialize(serializer)
    }
}
