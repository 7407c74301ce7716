//! Repository port for per-user task history and ratings.

use super::GradingStoreResult;
use crate::grading::domain::{AttemptSnapshot, TaskSpec, UserLogin, UserTaskResult};
use async_trait::async_trait;

/// Persistence contract for user standings.
#[async_trait]
pub trait StandingsRepository: Send + Sync {
    /// Finds the user's aggregate for a task.
    async fn find_user_task_result(
        &self,
        user: &UserLogin,
        task: &TaskSpec,
    ) -> GradingStoreResult<Option<UserTaskResult>>;

    /// Inserts a new aggregate.
    async fn insert_user_task_result(&self, result: &UserTaskResult) -> GradingStoreResult<()>;

    /// Appends `current` to the aggregate's results and `best` to its bests.
    async fn append_user_task_result(
        &self,
        user: &UserLogin,
        task: &TaskSpec,
        current: &AttemptSnapshot,
        best: &AttemptSnapshot,
    ) -> GradingStoreResult<()>;

    /// Adds one point to the user's rating, creating the rating when absent.
    async fn increment_rating(&self, user: &UserLogin) -> GradingStoreResult<()>;

    /// Returns the user's rating score, if any.
    async fn find_rating(&self, user: &UserLogin) -> GradingStoreResult<Option<u64>>;
}
