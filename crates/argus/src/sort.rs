//! Event ordering utility
//!
//! The service's pages are unordered; the oldest event is the one with the
//! smallest key. Every consumer of a raw page must sort before assuming
//! chronological order.

use argus_core::Event;

/// Sort events in place, ascending by key (oldest first).
///
/// Stable and idempotent.
pub fn by_key(events: &mut [Event]) {
    events.sort_by_key(|e| e.key);
}
