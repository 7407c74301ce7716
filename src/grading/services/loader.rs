//! Loading of an attempt and the tests it is graded against.

use crate::grading::{
    domain::{
        Attempt, AttemptSpec, GradingDomainError, GradingJob, GroupId, GroupedTests, TaskSpec,
        TaskTest, TestSpec,
    },
    ports::{AttemptRepository, CatalogRepository, GradingStoreError},
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading an attempt for grading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The attempt record does not exist.
    #[error("attempt {0} not found")]
    AttemptNotFound(AttemptSpec),
    /// The attempt has no grading-job descriptor.
    #[error("grading job for attempt {0} not found")]
    GradingJobNotFound(AttemptSpec),
    /// The task record does not exist.
    #[error("task {0} not found")]
    TaskNotFound(TaskSpec),
    /// A result slot references a missing test case.
    #[error("test {0} not found")]
    TestNotFound(TestSpec),
    /// The task layout is inconsistent with the attempt.
    #[error(transparent)]
    Domain(#[from] GradingDomainError),
    /// Storage read failed.
    #[error(transparent)]
    Store(#[from] GradingStoreError),
}

/// Attempt plus everything needed to grade it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedAttempt {
    /// The attempt as read from storage.
    pub attempt: Attempt,
    /// Its grading-job descriptor.
    pub job: GradingJob,
    /// Graded tests, one per result slot, in slot order.
    pub tests: Vec<TaskTest>,
    /// Group of each graded test, aligned with `tests`.
    pub groups: Vec<GroupId>,
}

impl LoadedAttempt {
    /// Buckets the graded tests by group.
    #[must_use]
    pub fn grouped_tests(&self) -> GroupedTests {
        GroupedTests::from_aligned(&self.tests, &self.groups)
    }
}

/// Reads an attempt, its job, its task layout and its test cases.
pub struct AttemptLoader<S>
where
    S: AttemptRepository + CatalogRepository,
{
    store: Arc<S>,
}

impl<S> AttemptLoader<S>
where
    S: AttemptRepository + CatalogRepository,
{
    /// Creates a loader.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Loads `attempt` of `task`.
    ///
    /// The attempt, its job and the task layout are read concurrently; the
    /// test cases are then fetched in one batch and reordered to follow the
    /// attempt's result slots.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] when a referenced record is missing, when the
    /// task's test groups are invalid, or when storage fails.
    pub async fn load(
        &self,
        attempt: &AttemptSpec,
        task: &TaskSpec,
    ) -> Result<LoadedAttempt, LoadError> {
        let (found_attempt, found_job, found_layout) = tokio::try_join!(
            self.store.find_attempt(attempt),
            self.store.find_grading_job(attempt),
            self.store.find_task_layout(task),
        )?;
        let record = found_attempt.ok_or_else(|| LoadError::AttemptNotFound(attempt.clone()))?;
        let job = found_job.ok_or_else(|| LoadError::GradingJobNotFound(attempt.clone()))?;
        let layout = found_layout.ok_or_else(|| LoadError::TaskNotFound(task.clone()))?;

        let specs = record.test_specs();
        let by_spec: HashMap<TestSpec, TaskTest> = self
            .store
            .find_tests(&specs)
            .await?
            .into_iter()
            .map(|test| (test.spec.clone(), test))
            .collect();
        let tests = specs
            .iter()
            .map(|spec| {
                by_spec
                    .get(spec)
                    .cloned()
                    .ok_or_else(|| LoadError::TestNotFound(spec.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let groups = layout.groups_for(&tests)?;
        debug!(
            attempt = %attempt,
            tests = tests.len(),
            groups = layout.test_groups.len(),
            "loaded attempt for grading"
        );

        Ok(LoadedAttempt {
            attempt: record,
            job,
            tests,
            groups,
        })
    }
}
