//! Storage failures shared by every grading port.

use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

/// Result alias for grading store calls.
pub type GradingStoreResult<T> = Result<T, GradingStoreError>;

type Source = Arc<dyn StdError + Send + Sync>;

/// Failure of a grading store call.
///
/// Cloneable so one failed write can be logged and returned.
#[derive(Debug, Clone, Error)]
pub enum GradingStoreError {
    /// A stored record does not describe a valid attempt, task or job.
    #[error("stored grading record is invalid: {0}")]
    InvalidPersistedData(Source),

    /// The backing store rejected or could not serve the call.
    #[error("grading store unavailable: {0}")]
    Persistence(Source),
}

impl GradingStoreError {
    /// Wraps a record that failed to decode or validate.
    pub fn invalid_persisted_data(source: impl StdError + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(source))
    }

    /// Wraps a backend failure.
    pub fn persistence(source: impl StdError + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(source))
    }
}
