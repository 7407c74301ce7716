//! Alert sink that reports alerts through structured logs.

use async_trait::async_trait;
use tracing::error;

use crate::grading::ports::{Alert, AlertSink};

/// Alert sink emitting one `ERROR` event per alert.
///
/// Suitable when alert routing is handled by log collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAlertSink;

impl TracingAlertSink {
    /// Creates the sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AlertSink for TracingAlertSink {
    async fn send_alert(&self, alert: &Alert) {
        error!(
            alert_kind = %alert.kind,
            raised_at = %alert.raised_at,
            body = %alert.body(),
            "operator alert"
        );
    }
}
