//! Convenience re-exports for common argus usage.

pub use crate::category::CategoryCache;
pub use crate::collector::EventCollector;
pub use crate::manager::{EventManager, EventsOptions};
pub use crate::processor::EventProcessor;
pub use argus_core::{
    ArgusError, Event, EventFilter, EventKey, EventKind, EventSource, ObjectRef, ProcessorConfig,
    Result,
};
