//! Operator alert port.

use crate::grading::domain::AttemptSpec;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Category of an operator alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Grading an attempt failed.
    GradingFailure,
    /// Recording the system-error outcome after a grading failure failed.
    SaveFailure,
}

impl AlertKind {
    /// Returns the alert title shown to operators.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::GradingFailure => "ManagerError",
            Self::SaveFailure => "ManagerError (when saving results)",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Operator alert raised by the failure supervisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    /// Alert category.
    pub kind: AlertKind,
    /// Attempt the alert concerns.
    pub attempt: AttemptSpec,
    /// Failure description.
    pub message: String,
    /// Time the alert was raised.
    pub raised_at: DateTime<Utc>,
}

impl Alert {
    /// Creates an alert.
    #[must_use]
    pub fn new(
        kind: AlertKind,
        attempt: AttemptSpec,
        message: impl Into<String>,
        raised_at: DateTime<Utc>,
    ) -> Self {
        Self {
            kind,
            attempt,
            message: message.into(),
            raised_at,
        }
    }

    /// Returns the alert body: the attempt identifier, a newline and the
    /// failure description.
    #[must_use]
    pub fn body(&self) -> String {
        format!("{}\n{}", self.attempt, self.message)
    }
}

/// Delivery contract for operator alerts.
///
/// Delivery is best-effort: sinks report their own failures and never
/// return them to the caller.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Delivers one alert.
    async fn send_alert(&self, alert: &Alert);
}
