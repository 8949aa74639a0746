//! User-facing notification seam.
//!
//! Failures in the orchestrator and listing controller raise a transient,
//! non-blocking notification rather than propagating. The sink is a trait
//! so the binary can render it and tests can record it.

use tracing::warn;

/// Destination for transient user-facing notices.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, title: &str, body: &str);
}

/// Default sink: logs the notice at `warn`.
#[derive(Debug, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, title: &str, body: &str) {
        warn!("{}: {}", title, body);
    }
}
