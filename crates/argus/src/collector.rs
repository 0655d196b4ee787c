//! Per-object cursor wrapper
//!
//! Binds one server-side cursor to one monitored object. Every read
//! round-trips; the collector holds no local cache. The cursor is a
//! remote-side resource and must be released with [`EventCollector::destroy`]
//! when monitoring ends.

use argus_core::{
    observe, ArgusError, CursorHandle, Event, EventFilter, EventSource, ObjectRef, ReadDirection,
    Result,
};
use std::sync::Arc;
use std::time::Instant;

/// One remote cursor bound to one object.
pub struct EventCollector {
    source: Arc<dyn EventSource>,
    obj: ObjectRef,
    cursor: CursorHandle,
}

impl EventCollector {
    /// Create a cursor for `obj` scoped to `filter`.
    pub async fn create(
        source: Arc<dyn EventSource>,
        obj: ObjectRef,
        filter: &EventFilter,
    ) -> Result<Self> {
        let cursor = source
            .create_cursor(&obj, filter)
            .await
            .map_err(|e| ArgusError::remote("create_cursor", e))?;

        observe::record_cursor_created();
        tracing::debug!("created {} for {}", cursor, obj);

        Ok(Self {
            source,
            obj,
            cursor,
        })
    }

    /// The monitored object this collector is bound to.
    pub fn object(&self) -> &ObjectRef {
        &self.obj
    }

    /// The underlying cursor handle.
    pub fn cursor(&self) -> CursorHandle {
        self.cursor
    }

    /// Return whatever page the server currently has buffered.
    ///
    /// May be empty. The server manages the window; this does not advance
    /// or rewind explicitly.
    pub async fn latest_page(&self) -> Result<Vec<Event>> {
        let start = Instant::now();
        let page = self
            .source
            .latest_page(self.cursor)
            .await
            .map_err(|e| ArgusError::remote("latest_page", e))?;
        observe::record_page_read(start.elapsed(), page.len());
        Ok(page)
    }

    /// Advance the cursor toward newer events, returning up to `max_count`.
    pub async fn read_next(&self, max_count: u32) -> Result<Vec<Event>> {
        self.read(ReadDirection::Newer, max_count).await
    }

    /// Advance the cursor toward older events, returning up to `max_count`.
    pub async fn read_prev(&self, max_count: u32) -> Result<Vec<Event>> {
        self.read(ReadDirection::Older, max_count).await
    }

    async fn read(&self, direction: ReadDirection, max_count: u32) -> Result<Vec<Event>> {
        let start = Instant::now();
        let page = self
            .source
            .read_page(self.cursor, direction, max_count)
            .await
            .map_err(|e| ArgusError::remote("read_page", e))?;
        observe::record_page_read(start.elapsed(), page.len());
        Ok(page)
    }

    /// Release the server-side cursor.
    ///
    /// Consumes the collector; the handle is unusable afterwards.
    pub async fn destroy(self) -> Result<()> {
        self.source
            .destroy_cursor(self.cursor)
            .await
            .map_err(|e| ArgusError::remote("destroy_cursor", e))?;

        observe::record_cursor_destroyed();
        tracing::debug!("destroyed {} for {}", self.cursor, self.obj);
        Ok(())
    }
}
