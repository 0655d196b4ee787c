//! Multi-object event fan-out and tail loop
//!
//! The processor coordinates one cursor per monitored object against one
//! user callback. Lifecycle: enroll objects (one remote cursor each, fail
//! fast on the first failure), drain the initial pages, then optionally
//! poll for new pages until cancelled, and finally destroy every cursor
//! exactly once.
//!
//! Objects are processed sequentially, one blocking remote call at a time.
//! Within one callback invocation for one object, events are sorted
//! ascending by key; interleaving across objects is unspecified, but a
//! single object's stream is never reordered.

use crate::collector::EventCollector;
use crate::sort;
use argus_core::{
    observe, ArgusError, Event, EventFilter, EventSource, ObjectRef, ProcessorConfig, Result,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Fan-out processor: N monitored objects, one callback.
///
/// There is no retry on failed remote calls: the first terminal error from
/// any cursor read aborts the whole run. Callers needing resilience wrap
/// their own retries around [`EventManager::events`](crate::EventManager::events).
pub struct EventProcessor {
    source: Arc<dyn EventSource>,
    config: ProcessorConfig,
    filter: EventFilter,
    collectors: Vec<EventCollector>,
    cancel: CancellationToken,
    destroyed: bool,
}

impl EventProcessor {
    pub fn new(source: Arc<dyn EventSource>, config: ProcessorConfig, filter: EventFilter) -> Self {
        Self {
            source,
            config,
            filter,
            collectors: Vec::new(),
            cancel: CancellationToken::new(),
            destroyed: false,
        }
    }

    /// Use an externally owned cancellation token instead of the
    /// processor's own.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token observed between reads and during the poll sleep.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Number of live cursors.
    pub fn len(&self) -> usize {
        self.collectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collectors.is_empty()
    }

    /// Create and register a cursor for `obj`.
    ///
    /// Registration is idempotent: enrolling an already monitored object
    /// reuses its existing cursor. Fails with a remote error when cursor
    /// creation fails; cursors created for previously enrolled objects
    /// stay live until [`destroy`](Self::destroy).
    pub async fn add_object(&mut self, obj: ObjectRef) -> Result<()> {
        if self.destroyed {
            return Err(ArgusError::Terminated);
        }

        if self.collectors.iter().any(|c| c.object() == &obj) {
            tracing::debug!("object {} already enrolled, reusing cursor", obj);
            return Ok(());
        }

        let collector =
            EventCollector::create(self.source.clone(), obj, &self.filter).await?;
        self.collectors.push(collector);
        Ok(())
    }

    /// Drive the drain phase and, when `tail` is set, the poll loop.
    ///
    /// Blocks until cancellation, the drain completing (non-tail), or the
    /// first terminal error from any cursor read or from the callback. No
    /// per-object error is swallowed.
    pub async fn run<F>(&mut self, tail: bool, callback: &mut F) -> Result<()>
    where
        F: FnMut(&ObjectRef, Vec<Event>) -> anyhow::Result<()> + Send,
    {
        if self.destroyed {
            return Err(ArgusError::Terminated);
        }

        self.drain(callback).await?;

        if !tail || self.cancel.is_cancelled() {
            return Ok(());
        }

        self.poll(callback).await
    }

    /// Deliver the initial latest-page snapshot per object, then keep
    /// reading forward until the server returns an empty page. One callback
    /// invocation per non-empty page.
    async fn drain<F>(&self, callback: &mut F) -> Result<()>
    where
        F: FnMut(&ObjectRef, Vec<Event>) -> anyhow::Result<()> + Send,
    {
        let page_size = self.config.page_size;

        for collector in &self.collectors {
            if self.cancel.is_cancelled() {
                return Ok(());
            }

            let page = collector.latest_page().await?;
            if !page.is_empty() {
                Self::deliver(collector.object(), page, callback)?;
            }

            loop {
                let page = collector.read_next(page_size).await?;
                if page.is_empty() {
                    break;
                }
                Self::deliver(collector.object(), page, callback)?;
            }
        }

        Ok(())
    }

    /// Tail loop: read forward on every cursor, sleep, repeat until
    /// cancelled.
    async fn poll<F>(&self, callback: &mut F) -> Result<()>
    where
        F: FnMut(&ObjectRef, Vec<Event>) -> anyhow::Result<()> + Send,
    {
        let page_size = self.config.page_size;
        tracing::debug!(
            objects = self.collectors.len(),
            interval = ?self.config.poll_interval,
            "tailing event streams"
        );

        loop {
            for collector in &self.collectors {
                if self.cancel.is_cancelled() {
                    return Ok(());
                }

                let page = collector.read_next(page_size).await?;
                if !page.is_empty() {
                    Self::deliver(collector.object(), page, callback)?;
                }
            }

            observe::record_poll_iteration();

            tokio::select! {
                _ = self.cancel.cancelled() => return Ok(()),
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }
        }
    }

    fn deliver<F>(obj: &ObjectRef, mut page: Vec<Event>, callback: &mut F) -> Result<()>
    where
        F: FnMut(&ObjectRef, Vec<Event>) -> anyhow::Result<()> + Send,
    {
        sort::by_key(&mut page);
        callback(obj, page).map_err(ArgusError::Callback)
    }

    /// Release every cursor, each exactly once. Idempotent.
    ///
    /// Runs on every exit path of [`EventManager::events`](crate::EventManager::events),
    /// including cancellation and error returns. A failed remote release is
    /// logged and does not stop the remaining cursors from being released.
    pub async fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;

        for collector in self.collectors.drain(..) {
            let obj = collector.object().clone();
            if let Err(e) = collector.destroy().await {
                tracing::warn!("failed to destroy cursor for {}: {}", obj, e);
            }
        }
    }
}
