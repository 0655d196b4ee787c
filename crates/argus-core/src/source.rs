//! The remote API surface consumed by the event pipeline
//!
//! Three remote operations drive everything: cursor creation, page reads,
//! and cursor destruction. A cursor ("history collector") is a server-side
//! stateful handle bound to one object and one filter; every read mutates
//! its position and round-trips to the service. Cursors are a remote-side
//! resource and must be destroyed explicitly when monitoring ends.

use crate::filter::EventFilter;
use crate::types::{Event, ObjectRef};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;

/// Opaque handle to a server-side cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CursorHandle(pub u64);

impl fmt::Display for CursorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cursor-{}", self.0)
    }
}

/// Direction of an explicit page read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadDirection {
    /// Toward newer events.
    Newer,
    /// Toward older events.
    Older,
}

/// Failure of a remote call.
///
/// Argus never retries these; they are surfaced to the caller wrapped with
/// the originating operation's context.
#[derive(Debug, Clone)]
pub struct RemoteError {
    message: String,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RemoteError {}

/// The remote event service.
///
/// Implementations own the transport (SOAP/REST, whatever the deployment
/// uses); argus only shapes calls and pages through results. The in-memory
/// simulator in the `argus` crate implements this trait for tests and the
/// CLI.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Create a server-side cursor for one object, scoped to `filter`.
    async fn create_cursor(
        &self,
        obj: &ObjectRef,
        filter: &EventFilter,
    ) -> Result<CursorHandle, RemoteError>;

    /// Return the page the server currently has buffered for this cursor.
    ///
    /// May be empty. The server replaces the buffered window on each read;
    /// the client does not control it explicitly.
    async fn latest_page(&self, cursor: CursorHandle) -> Result<Vec<Event>, RemoteError>;

    /// Advance the cursor in `direction` and return up to `max_count`
    /// events. Returned pages are unordered; sort before consuming.
    async fn read_page(
        &self,
        cursor: CursorHandle,
        direction: ReadDirection,
        max_count: u32,
    ) -> Result<Vec<Event>, RemoteError>;

    /// Release the server-side cursor. Failing to call this leaks a
    /// remote resource for the life of the session.
    async fn destroy_cursor(&self, cursor: CursorHandle) -> Result<(), RemoteError>;

    /// The service's static event classification map: type name to
    /// category (e.g. "info", "error"). The value is static; callers cache
    /// it.
    async fn event_categories(&self) -> Result<HashMap<String, String>, RemoteError>;

    /// One-shot unpaged query for events matching `filter` on one object.
    ///
    /// Default implementation creates a cursor, takes its latest page and
    /// tears the cursor down again.
    async fn query_events(
        &self,
        obj: &ObjectRef,
        filter: &EventFilter,
    ) -> Result<Vec<Event>, RemoteError> {
        let cursor = self.create_cursor(obj, filter).await?;
        let page = self.latest_page(cursor).await;
        // Release the cursor even when the read failed.
        let destroyed = self.destroy_cursor(cursor).await;
        let page = page?;
        destroyed?;
        Ok(page)
    }
}
