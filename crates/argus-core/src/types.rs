//! Event and object reference types
//!
//! Events arrive from the remote service in pages that are NOT ordered by
//! key; the oldest event in a page is the one with the smallest key. Any
//! consumer of a raw page must sort before assuming chronological order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Event key - monotonically increasing, smallest = oldest
pub type EventKey = i64;

/// Opaque reference to a monitored entity, supplied by the caller.
///
/// Mirrors the remote service's managed object references: a type name plus
/// an identifier, e.g. `VirtualMachine:vm-42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    pub kind: String,
    pub id: String,
}

impl ObjectRef {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Shape discriminator for the closed set of event variants.
///
/// Classic events carry only a type name; their category comes from the
/// service's static classification map. Extended events carry their own
/// severity field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum EventKind {
    Classic {
        type_name: String,
    },
    Extended {
        event_type_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        severity: Option<String>,
    },
}

impl EventKind {
    /// The type name used for filtering and category lookup.
    pub fn type_name(&self) -> &str {
        match self {
            EventKind::Classic { type_name } => type_name,
            EventKind::Extended { event_type_id, .. } => event_type_id,
        }
    }
}

/// A single event record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Monotonically increasing key; the only ordering signal in a page.
    pub key: EventKey,

    /// When the event was created on the service side.
    pub created: chrono::DateTime<chrono::Utc>,

    /// Human-readable formatted message.
    pub message: String,

    /// Variant tag: classic typed event or extended event.
    pub kind: EventKind,
}

impl Event {
    /// The event's type name (classic class name or extended type id).
    pub fn type_name(&self) -> &str {
        self.kind.type_name()
    }
}
