//! Event manager: the public entry point
//!
//! Mirrors the remote service's event manager object: enrollment limit
//! guard, the `events` call that drives a processor over N objects, and
//! category lookup for individual events.

use crate::category::CategoryCache;
use crate::processor::EventProcessor;
use argus_core::{
    ArgusError, Event, EventFilter, EventKind, EventSource, ObjectRef, ProcessorConfig, Result,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Boxed form of the per-object event callback.
pub type EventCallback<'a> =
    Box<dyn FnMut(&ObjectRef, Vec<Event>) -> anyhow::Result<()> + Send + 'a>;

/// Options for [`EventManager::events_with`].
///
/// The positional [`EventManager::events`] call covers the common case;
/// this struct carries everything else so the signature can grow without
/// breaking callers.
#[derive(Debug, Clone, Default)]
pub struct EventsOptions {
    /// Events per page read. 0 means the manager default.
    pub page_size: u32,

    /// Keep polling for new pages until cancelled.
    pub tail: bool,

    /// Override the monitored-object ceiling.
    pub force: bool,

    /// Restrict the streams to these event type names. Empty = all.
    pub kinds: Vec<String>,

    /// Sleep between tail poll iterations. None means the manager default.
    pub poll_interval: Option<Duration>,

    /// Cancellation observed between reads and during the poll sleep.
    pub cancel: Option<CancellationToken>,
}

impl EventsOptions {
    pub fn tail(mut self) -> Self {
        self.tail = true;
        self
    }

    pub fn force(mut self) -> Self {
        self.force = true;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_kinds(mut self, kinds: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.kinds = kinds.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// Client-side handle on the remote event service.
pub struct EventManager {
    source: Arc<dyn EventSource>,
    config: ProcessorConfig,
    categories: Arc<CategoryCache>,
}

impl EventManager {
    pub fn new(source: Arc<dyn EventSource>) -> Self {
        Self {
            source,
            config: ProcessorConfig::default(),
            categories: Arc::new(CategoryCache::new()),
        }
    }

    pub fn with_config(mut self, config: ProcessorConfig) -> Self {
        self.config = config;
        self
    }

    /// Share a category cache across managers.
    pub fn with_category_cache(mut self, categories: Arc<CategoryCache>) -> Self {
        self.categories = categories;
        self
    }

    pub fn source(&self) -> &Arc<dyn EventSource> {
        &self.source
    }

    /// Get the events from the specified object(s) and optionally tail the
    /// event streams.
    ///
    /// Fails with [`ArgusError::LimitExceeded`] before any remote call when
    /// the object count reaches the configured ceiling and `force` is not
    /// set. The callback receives each page sorted ascending by key; a
    /// callback error aborts the run. Cursors are released on every exit
    /// path.
    pub async fn events<F>(
        &self,
        objects: &[ObjectRef],
        page_size: u32,
        tail: bool,
        force: bool,
        callback: F,
    ) -> Result<()>
    where
        F: FnMut(&ObjectRef, Vec<Event>) -> anyhow::Result<()> + Send,
    {
        let opts = EventsOptions {
            page_size,
            tail,
            force,
            ..Default::default()
        };
        self.events_with(objects, opts, callback).await
    }

    /// [`events`](Self::events) with the full option set: type filter,
    /// poll interval, cancellation token.
    pub async fn events_with<F>(
        &self,
        objects: &[ObjectRef],
        opts: EventsOptions,
        mut callback: F,
    ) -> Result<()>
    where
        F: FnMut(&ObjectRef, Vec<Event>) -> anyhow::Result<()> + Send,
    {
        // Local guard, checked before any remote interaction.
        if objects.len() >= self.config.max_objects && !opts.force {
            return Err(ArgusError::LimitExceeded {
                limit: self.config.max_objects,
                requested: objects.len(),
            });
        }

        let mut config = self.config.clone();
        if opts.page_size > 0 {
            config.page_size = opts.page_size;
        }
        if let Some(interval) = opts.poll_interval {
            config.poll_interval = interval;
        }

        let filter = EventFilter::types(opts.kinds.clone());
        let mut processor = EventProcessor::new(self.source.clone(), config, filter);
        if let Some(cancel) = opts.cancel.clone() {
            processor = processor.with_cancellation(cancel);
        }

        // Enrollment is all-or-nothing: the first failed cursor creation
        // aborts, and the unconditional teardown below releases whatever
        // was already created.
        let result = async {
            for obj in objects {
                processor.add_object(obj.clone()).await?;
            }
            processor.run(opts.tail, &mut callback).await
        }
        .await;

        processor.destroy().await;

        result
    }

    /// One-shot unpaged event query for a single object.
    pub async fn query_events(&self, obj: &ObjectRef, filter: &EventFilter) -> Result<Vec<Event>> {
        self.source
            .query_events(obj, filter)
            .await
            .map_err(|e| ArgusError::remote("query_events", e))
    }

    /// The category for an event, such as "info" or "error".
    ///
    /// Extended events carry their own severity (empty means "info");
    /// classic events consult the service's classification map, fetched
    /// once through the injected cache.
    pub async fn event_category(&self, event: &Event) -> Result<String> {
        match &event.kind {
            EventKind::Extended { severity, .. } => match severity.as_deref() {
                None | Some("") => Ok("info".to_string()),
                Some(s) => Ok(s.to_string()),
            },
            EventKind::Classic { type_name } => {
                self.categories.category(self.source.as_ref(), type_name).await
            }
        }
    }
}
