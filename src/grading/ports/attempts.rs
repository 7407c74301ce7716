//! Repository port for attempts, grading-job descriptors and status mirrors.

use super::GradingStoreResult;
use crate::grading::domain::{Attempt, AttemptSpec, AttemptStatus, FinishedAttempt, GradingJob};
use async_trait::async_trait;

/// Persistence contract for attempt records and their in-flight state.
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// Finds an attempt by identifier.
    ///
    /// Returns `None` when the attempt does not exist.
    async fn find_attempt(&self, spec: &AttemptSpec) -> GradingStoreResult<Option<Attempt>>;

    /// Finds the grading-job descriptor of an attempt.
    ///
    /// Returns `None` when no job is queued or in flight for the attempt.
    async fn find_grading_job(&self, attempt: &AttemptSpec)
    -> GradingStoreResult<Option<GradingJob>>;

    /// Conditionally moves an attempt from `from` to `to`.
    ///
    /// Returns the number of attempt records modified: `1` when the attempt
    /// was in `from`, `0` otherwise. The check and the write are atomic.
    async fn transition_status(
        &self,
        spec: &AttemptSpec,
        from: AttemptStatus,
        to: AttemptStatus,
    ) -> GradingStoreResult<u64>;

    /// Sets the per-user-task status mirror of an attempt.
    ///
    /// Returns the number of mirror records modified.
    async fn set_status_mirror(
        &self,
        attempt: &AttemptSpec,
        status: AttemptStatus,
    ) -> GradingStoreResult<u64>;

    /// Writes the terminal state of an attempt and marks it finished.
    async fn finish_attempt(
        &self,
        spec: &AttemptSpec,
        finished: &FinishedAttempt,
    ) -> GradingStoreResult<()>;

    /// Deletes the grading-job descriptor of an attempt.
    ///
    /// Deleting an absent descriptor is not an error.
    async fn delete_grading_job(&self, attempt: &AttemptSpec) -> GradingStoreResult<()>;
}
