//! Event category classification cache
//!
//! The service exposes a static map from event type name to category
//! ("info", "error", ...). The value never changes for a session, so it is
//! fetched once and cached. The cache is an explicit object injected into
//! [`EventManager`](crate::EventManager) - never a process-wide singleton -
//! and the fill is guarded so concurrent first lookups trigger exactly one
//! remote fetch.

use argus_core::{ArgusError, EventSource, Result};
use std::collections::HashMap;
use tokio::sync::OnceCell;

/// Fill-once cache of the service's event classification map.
#[derive(Default)]
pub struct CategoryCache {
    map: OnceCell<HashMap<String, String>>,
}

impl CategoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the category for `type_name`, fetching the map from
    /// `source` on first use.
    ///
    /// Returns an empty string for type names the service does not
    /// classify.
    pub async fn category(&self, source: &dyn EventSource, type_name: &str) -> Result<String> {
        let map = self
            .map
            .get_or_try_init(|| async {
                tracing::debug!("fetching event category map");
                source
                    .event_categories()
                    .await
                    .map_err(|e| ArgusError::remote("event_categories", e))
            })
            .await?;

        Ok(map.get(type_name).cloned().unwrap_or_default())
    }

    /// Whether the map has been fetched yet.
    pub fn is_filled(&self) -> bool {
        self.map.initialized()
    }
}
