//! # Events
//!
//! An [`Event`] is what publishers post to the topic and what subscribers
//! receive. Only `eventType` and `subject` are examined by the core; every
//! other field is carried through to delivery unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A published event in the Event Grid schema.
///
/// Every field is optional on the wire. Fields the schema does not name are
/// collected into [`Event::extensions`] and serialized back at the top level,
/// so a delivered event is the event that was published.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Publisher-assigned unique identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Full resource path of the event source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    /// Publisher-defined path to the event subject. Filtered on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// One of the registered event types for this source. Filtered on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,

    /// Time the event was generated, as sent by the publisher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_time: Option<String>,

    /// Event payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Schema version of the data object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_version: Option<String>,

    /// Schema version of the event metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_version: Option<String>,

    /// Fields outside the Event Grid schema.
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Event {
    /// Create an event with a type and subject and nothing else.
    pub fn new(event_type: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            event_type: Some(event_type.into()),
            subject: Some(subject.into()),
            ..Self::default()
        }
    }

    /// Attach a data payload.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Attach a publisher id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Label used in log lines: the id when present, otherwise the type.
    pub fn log_label(&self) -> &str {
        self.id
            .as_deref()
            .or(self.event_type.as_deref())
            .unwrap_or("<untyped>")
    }
}
