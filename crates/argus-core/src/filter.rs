//! Event filtering by type name
//!
//! The filter is handed to the service at cursor creation so filtering
//! happens server-side; the simulator applies the same predicate locally.

use crate::types::Event;
use serde::{Deserialize, Serialize};

/// Filter for events, matched against the event's type name.
///
/// An empty type list matches every event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    types: Vec<String>,
}

impl EventFilter {
    /// Match all events.
    pub fn all() -> Self {
        Self::default()
    }

    /// Match only the given event type names.
    pub fn types(types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            types: types.into_iter().map(Into::into).collect(),
        }
    }

    /// Add a type name to the filter.
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.types.push(type_name.into());
        self
    }

    /// Check if an event matches this filter.
    pub fn matches(&self, event: &Event) -> bool {
        self.types.is_empty() || self.types.iter().any(|t| t == event.type_name())
    }

    /// Whether this filter restricts event types at all.
    pub fn is_all(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventKind;

    fn test_event(type_name: &str) -> Event {
        Event {
            key: 1,
            created: chrono::Utc::now(),
            message: String::new(),
            kind: EventKind::Classic {
                type_name: type_name.to_string(),
            },
        }
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let filter = EventFilter::all();
        assert!(filter.matches(&test_event("VmPoweredOnEvent")));
        assert!(filter.is_all());
    }

    #[test]
    fn test_type_filter() {
        let filter = EventFilter::types(["VmPoweredOnEvent", "VmPoweredOffEvent"]);
        assert!(filter.matches(&test_event("VmPoweredOnEvent")));
        assert!(filter.matches(&test_event("VmPoweredOffEvent")));
        assert!(!filter.matches(&test_event("VmMigratedEvent")));
    }

    #[test]
    fn test_filter_matches_extended_type_id() {
        let filter = EventFilter::all().with_type("com.example.custom");
        let event = Event {
            key: 1,
            created: chrono::Utc::now(),
            message: String::new(),
            kind: EventKind::Extended {
                event_type_id: "com.example.custom".into(),
                severity: None,
            },
        };
        assert!(filter.matches(&event));
    }
}
