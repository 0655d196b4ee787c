//! In-memory event service simulator
//!
//! Implements [`EventSource`] over seeded per-object event histories, with
//! the same cursor semantics the real service has: a per-cursor window that
//! every read mutates, page size validation, and explicit destruction. Used
//! by the test suites and by the CLI for offline replay.
//!
//! The simulator counts cursor creations and destructions and supports
//! failure injection, so tests can assert the exactly-once teardown and
//! fail-fast enrollment contracts.

use argus_core::{
    ArgusError, CursorHandle, Event, EventFilter, EventKind, EventSource, ObjectRef,
    ReadDirection, RemoteError, Result,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The service default page size, used when a caller passes 0.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// The service ceiling on page sizes.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Validate a requested page size the way the service does.
///
/// 0 selects the default; negative or above-ceiling values are invalid.
pub fn validate_page_size(count: i32) -> Result<u32> {
    if count == 0 {
        Ok(DEFAULT_PAGE_SIZE)
    } else if count < 0 || count as u32 > MAX_PAGE_SIZE {
        Err(ArgusError::InvalidPageSize(count as i64))
    } else {
        Ok(count as u32)
    }
}

/// Build a classic typed event.
pub fn classic_event(key: i64, type_name: &str, message: &str) -> Event {
    Event {
        key,
        created: chrono::Utc::now(),
        message: message.to_string(),
        kind: EventKind::Classic {
            type_name: type_name.to_string(),
        },
    }
}

/// Build an extended event with an optional severity.
pub fn extended_event(key: i64, event_type_id: &str, severity: Option<&str>) -> Event {
    Event {
        key,
        created: chrono::Utc::now(),
        message: format!("{event_type_id} fired"),
        kind: EventKind::Extended {
            event_type_id: event_type_id.to_string(),
            severity: severity.map(str::to_string),
        },
    }
}

/// Seed file format for the CLI: per-object histories plus the
/// classification map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSeed {
    pub objects: Vec<SeedObject>,
    #[serde(default)]
    pub categories: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedObject {
    pub object: ObjectRef,
    pub events: Vec<Event>,
}

struct CursorState {
    obj: ObjectRef,
    filter: EventFilter,
    /// Index into the object's filtered history of the next unread event.
    pos: usize,
}

#[derive(Default)]
struct SimState {
    histories: HashMap<ObjectRef, Vec<Event>>,
    categories: HashMap<String, String>,
    cursors: HashMap<u64, CursorState>,
    next_handle: u64,

    created_cursors: usize,
    destroyed_cursors: usize,
    category_fetches: usize,

    create_failures: HashMap<ObjectRef, String>,
    read_failure: Option<String>,
}

/// In-memory [`EventSource`].
pub struct SimSource {
    state: Mutex<SimState>,
    page_size: u32,
}

impl SimSource {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SimState::default()),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Page window used by `latest_page`.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Populate the simulator from a seed.
    pub fn from_seed(seed: SimSeed) -> Self {
        let sim = Self::new();
        {
            let mut state = sim.state.lock();
            for entry in seed.objects {
                state.histories.insert(entry.object, entry.events);
            }
            state.categories = seed.categories;
        }
        sim
    }

    /// Append events to an object's history. Visible to live cursors, so
    /// tailing runs pick them up on the next poll.
    pub fn seed(&self, obj: &ObjectRef, events: impl IntoIterator<Item = Event>) {
        let mut state = self.state.lock();
        state
            .histories
            .entry(obj.clone())
            .or_default()
            .extend(events);
    }

    /// Set the classification map returned by `event_categories`.
    pub fn set_categories(&self, categories: HashMap<String, String>) {
        self.state.lock().categories = categories;
    }

    /// Make cursor creation fail for one object.
    pub fn fail_create(&self, obj: &ObjectRef, message: &str) {
        self.state
            .lock()
            .create_failures
            .insert(obj.clone(), message.to_string());
    }

    /// Make every page read fail.
    pub fn fail_reads(&self, message: &str) {
        self.state.lock().read_failure = Some(message.to_string());
    }

    /// Total cursors ever created.
    pub fn created_cursors(&self) -> usize {
        self.state.lock().created_cursors
    }

    /// Total cursors destroyed.
    pub fn destroyed_cursors(&self) -> usize {
        self.state.lock().destroyed_cursors
    }

    /// Cursors currently live.
    pub fn live_cursors(&self) -> usize {
        self.state.lock().cursors.len()
    }

    /// How many times the classification map was fetched.
    pub fn category_fetches(&self) -> usize {
        self.state.lock().category_fetches
    }

    fn filtered(state: &SimState, obj: &ObjectRef, filter: &EventFilter) -> Vec<Event> {
        state
            .histories
            .get(obj)
            .map(|history| {
                history
                    .iter()
                    .filter(|e| filter.matches(e))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn read(
        &self,
        cursor: CursorHandle,
        direction: ReadDirection,
        max_count: u32,
    ) -> std::result::Result<Vec<Event>, RemoteError> {
        let mut state = self.state.lock();
        if let Some(message) = state.read_failure.clone() {
            return Err(RemoteError::new(message));
        }

        let cursor_state = state
            .cursors
            .get(&cursor.0)
            .ok_or_else(|| RemoteError::new(format!("unknown cursor {}", cursor.0)))?;
        let history = Self::filtered(&state, &cursor_state.obj, &cursor_state.filter);
        let pos = cursor_state.pos;
        let max = max_count as usize;

        let (page, new_pos) = match direction {
            ReadDirection::Newer => {
                let end = (pos + max).min(history.len());
                (history[pos..end].to_vec(), end)
            }
            ReadDirection::Older => {
                let start = pos.saturating_sub(max);
                (history[start..pos].to_vec(), start)
            }
        };

        if let Some(cursor_state) = state.cursors.get_mut(&cursor.0) {
            cursor_state.pos = new_pos;
        }
        Ok(page)
    }
}

#[async_trait]
impl EventSource for SimSource {
    async fn create_cursor(
        &self,
        obj: &ObjectRef,
        filter: &EventFilter,
    ) -> std::result::Result<CursorHandle, RemoteError> {
        let mut state = self.state.lock();
        if let Some(message) = state.create_failures.get(obj) {
            return Err(RemoteError::new(message.clone()));
        }

        state.next_handle += 1;
        let handle = state.next_handle;
        state.cursors.insert(
            handle,
            CursorState {
                obj: obj.clone(),
                filter: filter.clone(),
                pos: 0,
            },
        );
        state.created_cursors += 1;
        Ok(CursorHandle(handle))
    }

    async fn latest_page(
        &self,
        cursor: CursorHandle,
    ) -> std::result::Result<Vec<Event>, RemoteError> {
        self.read(cursor, ReadDirection::Newer, self.page_size)
    }

    async fn read_page(
        &self,
        cursor: CursorHandle,
        direction: ReadDirection,
        max_count: u32,
    ) -> std::result::Result<Vec<Event>, RemoteError> {
        self.read(cursor, direction, max_count)
    }

    async fn destroy_cursor(&self, cursor: CursorHandle) -> std::result::Result<(), RemoteError> {
        let mut state = self.state.lock();
        match state.cursors.remove(&cursor.0) {
            Some(_) => {
                state.destroyed_cursors += 1;
                Ok(())
            }
            None => Err(RemoteError::new(format!("unknown cursor {}", cursor.0))),
        }
    }

    async fn event_categories(
        &self,
    ) -> std::result::Result<HashMap<String, String>, RemoteError> {
        let mut state = self.state.lock();
        state.category_fetches += 1;
        Ok(state.categories.clone())
    }
}
