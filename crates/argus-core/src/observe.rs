//! Optional metrics instrumentation for argus.
//!
//! When the `observe` feature is enabled, key operations emit counters and
//! gauges via the [`metrics`] crate. A downstream application must install a
//! metrics recorder (e.g. `metrics-exporter-prometheus`) to collect the data.
//!
//! When the feature is **not** enabled every function in this module is a
//! zero-cost no-op.

/// Record a cursor creation.
///
/// - `argus.cursor.created_total` – counter
/// - `argus.cursor.live` – gauge, incremented
#[inline]
pub fn record_cursor_created() {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("argus.cursor.created_total").increment(1);
        metrics::gauge!("argus.cursor.live").increment(1.0);
    }
}

/// Record a cursor destruction.
///
/// - `argus.cursor.destroyed_total` – counter
/// - `argus.cursor.live` – gauge, decremented
#[inline]
pub fn record_cursor_destroyed() {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("argus.cursor.destroyed_total").increment(1);
        metrics::gauge!("argus.cursor.live").decrement(1.0);
    }
}

/// Record a page read (counter + latency histogram + events returned).
///
/// - `argus.page.reads_total` – counter
/// - `argus.page.read_duration_seconds` – histogram
/// - `argus.page.events_total` – counter
#[inline]
pub fn record_page_read(duration: std::time::Duration, events: usize) {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("argus.page.reads_total").increment(1);
        metrics::histogram!("argus.page.read_duration_seconds").record(duration.as_secs_f64());
        metrics::counter!("argus.page.events_total").increment(events as u64);
    }
    #[cfg(not(feature = "observe"))]
    {
        let _ = (duration, events);
    }
}

/// Record one poll iteration of a tailing run.
///
/// - `argus.poll.iterations_total` – counter
#[inline]
pub fn record_poll_iteration() {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("argus.poll.iterations_total").increment(1);
    }
}
