//! Route selection and strategy lookup.

use crate::grading::{
    domain::{CheckType, GradingJob, Route, TaskType},
    ports::Checker,
};
use std::sync::Arc;
use thiserror::Error;

/// Routing codes that name no known strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Unrecognised task-type code.
    #[error("unknown task type code {0}")]
    UnknownTaskType(i32),
    /// Unrecognised check-type code on a code task.
    #[error("unknown check type code {0}")]
    UnknownCheckType(i32),
}

/// Selects the strategy for a job.
///
/// Text tasks route to text comparison regardless of their check type.
///
/// # Errors
///
/// Returns [`DispatchError`] when a routing code is unknown.
pub const fn resolve_route(job: &GradingJob) -> Result<Route, DispatchError> {
    let Some(task_type) = TaskType::from_code(job.task_type) else {
        return Err(DispatchError::UnknownTaskType(job.task_type));
    };
    match task_type {
        TaskType::Text => Ok(Route::Text),
        TaskType::Code => match CheckType::from_code(job.task_check_type) {
            Some(CheckType::TestsChecker) => Ok(Route::Tests),
            Some(CheckType::CustomChecker) => Ok(Route::Custom),
            None => Err(DispatchError::UnknownCheckType(job.task_check_type)),
        },
    }
}

/// One strategy per route.
#[derive(Clone)]
pub struct CheckerSet {
    text: Arc<dyn Checker>,
    tests: Arc<dyn Checker>,
    custom: Arc<dyn Checker>,
}

impl CheckerSet {
    /// Creates the set.
    #[must_use]
    pub fn new(text: Arc<dyn Checker>, tests: Arc<dyn Checker>, custom: Arc<dyn Checker>) -> Self {
        Self {
            text,
            tests,
            custom,
        }
    }

    /// Returns the strategy serving `route`.
    #[must_use]
    pub fn for_route(&self, route: Route) -> &dyn Checker {
        match route {
            Route::Text => self.text.as_ref(),
            Route::Tests => self.tests.as_ref(),
            Route::Custom => self.custom.as_ref(),
        }
    }
}

impl std::fmt::Debug for CheckerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckerSet").finish_non_exhaustive()
    }
}
