//! Processor configuration

use std::time::Duration;

/// Default ceiling on monitored objects; a guard against accidental
/// unbounded fan-out, not flow control.
pub const DEFAULT_MAX_OBJECTS: usize = 10;

/// Default number of events per page read.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Configuration for an event processor run.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// How many events to request per page read.
    pub page_size: u32,

    /// How long to sleep between poll iterations in tail mode.
    pub poll_interval: Duration,

    /// Refuse to start when more than this many objects are enrolled,
    /// unless the caller explicitly overrides the limit.
    pub max_objects: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            poll_interval: Duration::from_secs(1),
            max_objects: DEFAULT_MAX_OBJECTS,
        }
    }
}

impl ProcessorConfig {
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_max_objects(mut self, max_objects: usize) -> Self {
        self.max_objects = max_objects;
        self
    }
}
