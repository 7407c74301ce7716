//! Attempt lifecycle status.

use super::ParseAttemptStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an attempt.
///
/// Status only moves forward: `pending → testing → finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    /// Submitted and waiting for a grader.
    Pending,
    /// Claimed by a grading pass.
    Testing,
    /// Grading completed with a terminal verdict set.
    Finished,
}

impl AttemptStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Testing => "testing",
            Self::Finished => "finished",
        }
    }

    /// Returns `true` when moving to `target` does not regress the status.
    ///
    /// Writing `finished` over `finished` is allowed so that fallback writes
    /// stay idempotent.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Testing | Self::Finished)
                | (Self::Testing | Self::Finished, Self::Finished)
        )
    }
}

impl fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AttemptStatus {
    type Error = ParseAttemptStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "testing" => Ok(Self::Testing),
            "finished" => Ok(Self::Finished),
            _ => Err(ParseAttemptStatusError(value.to_owned())),
        }
    }
}
