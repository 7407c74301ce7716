//! Read-only repository port for task definitions and language offsets.

use super::GradingStoreResult;
use crate::grading::domain::{Language, LanguageSpec, TaskLayout, TaskSpec, TaskTest, TestSpec};
use async_trait::async_trait;

/// Lookup contract for tasks, test cases and languages.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Finds the test and group layout of a task.
    async fn find_task_layout(&self, task: &TaskSpec) -> GradingStoreResult<Option<TaskLayout>>;

    /// Returns the test cases whose identifiers are in `specs`.
    ///
    /// Missing identifiers are skipped; the result order is unspecified.
    async fn find_tests(&self, specs: &[TestSpec]) -> GradingStoreResult<Vec<TaskTest>>;

    /// Finds a language configuration.
    async fn find_language(&self, spec: &LanguageSpec) -> GradingStoreResult<Option<Language>>;
}
