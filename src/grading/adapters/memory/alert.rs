//! Alert sink that keeps alerts in memory.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::grading::ports::{Alert, AlertSink};

/// Thread-safe alert sink recording every delivered alert.
#[derive(Debug, Clone, Default)]
pub struct RecordingAlertSink {
    alerts: Arc<Mutex<Vec<Alert>>>,
}

impl RecordingAlertSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the alerts delivered so far, oldest first.
    #[must_use]
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts
            .lock()
            .map(|alerts| alerts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AlertSink for RecordingAlertSink {
    async fn send_alert(&self, alert: &Alert) {
        if let Ok(mut alerts) = self.alerts.lock() {
            alerts.push(alert.clone());
        }
    }
}
