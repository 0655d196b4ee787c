//! Argus: Multi-object event tailing over a remote management API
//!
//! Argus consumes paged, unordered event streams from a virtualization
//! management service and delivers them, ordered, to a user callback:
//! - **EventManager**: entry point mirroring the remote service's event
//!   manager - enrollment limit guard, category lookup, the `events` call
//! - **EventProcessor**: fan-out over N monitored objects with drain and
//!   optional tail polling, cancellation, and exactly-once cursor teardown
//! - **EventCollector**: one server-side cursor bound to one object
//! - **sort**: the ordering utility every raw page must pass through
//! - **sim**: in-memory `EventSource` for tests and offline replay
//!
//! # Quick Start
//!
//! ```no_run
//! use argus::prelude::*;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let source: Arc<dyn EventSource> = Arc::new(argus::sim::SimSource::new());
//! let manager = EventManager::new(source);
//!
//! let vm = ObjectRef::new("VirtualMachine", "vm-1");
//! manager
//!     .events(&[vm], 25, false, false, |obj, events| {
//!         for event in events {
//!             println!("{} {} {}", obj, event.key, event.message);
//!         }
//!         Ok(())
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod category;
pub mod collector;
pub mod manager;
pub mod prelude;
pub mod processor;
pub mod sim;
pub mod sort;

// Re-export core types
pub use argus_core::{
    ArgusError, CursorHandle, Event, EventFilter, EventKey, EventKind, EventSource, ObjectRef,
    ProcessorConfig, ReadDirection, RemoteError, Result,
};

pub use category::CategoryCache;
pub use collector::EventCollector;
pub use manager::{EventCallback, EventManager, EventsOptions};
pub use processor::EventProcessor;
