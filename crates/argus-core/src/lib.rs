//! Argus Core: Types and traits for the argus event client
//!
//! This crate defines the shared abstractions for consuming paged event
//! streams from a remote virtualization management service:
//! - `EventSource`: the remote API surface (cursor create/read/destroy)
//! - Event model: opaque records keyed by a monotonically increasing key
//! - Error taxonomy: remote, limit-guard, and callback failures
//! - Filter: server-side event type filtering
//!
//! The wire protocol itself lives behind the `EventSource` trait; argus is a
//! pure consumer of it and performs no serialization of its own.

pub mod config;
pub mod error;
pub mod filter;
pub mod observe;
pub mod source;
pub mod types;

pub use config::ProcessorConfig;
pub use error::{ArgusError, Result};
pub use filter::EventFilter;
pub use source::{CursorHandle, EventSource, ReadDirection, RemoteError};
pub use types::{Event, EventKey, EventKind, ObjectRef};
