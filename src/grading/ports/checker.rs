//! Grading strategy port.
//!
//! A checker receives a fully resolved [`CheckJob`] and returns one verdict
//! per graded test plus a log bundle. Checkers never touch storage; the
//! orchestrator owns every write.

use crate::grading::domain::{
    AttemptSpec, CheckerProgram, ExecutionLimits, GroupId, GroupedTests, Language, Route, Verdict,
};
use async_trait::async_trait;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Result type for grading strategy calls.
pub type CheckerResult<T> = Result<T, CheckerError>;

/// Inputs of the text-answer strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextCheckJob {
    /// Attempt being graded.
    pub attempt: AttemptSpec,
    /// Submitted answers, in result order.
    pub answers: Vec<String>,
    /// Expected answers, aligned with the graded tests.
    pub expected: Vec<String>,
    /// Group of each graded test, aligned with `expected`.
    pub groups: Vec<GroupId>,
}

/// Inputs of the sandboxed tests strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestsCheckJob {
    /// Attempt being graded.
    pub attempt: AttemptSpec,
    /// Submitted program source.
    pub program: Option<String>,
    /// Program language and its offsets.
    pub language: Language,
    /// Limits after offsets.
    pub limits: ExecutionLimits,
    /// Graded tests bucketed by group.
    pub groups: GroupedTests,
    /// Scratch directory reserved for this run.
    pub workspace: Utf8PathBuf,
}

/// Inputs of the custom-checker strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomCheckJob {
    /// Program run parameters, shared with the tests strategy.
    #[serde(flatten)]
    pub run: TestsCheckJob,
    /// Checker program supplied by the task.
    pub checker: CheckerProgram,
    /// Checker language and its offsets.
    pub checker_language: Language,
}

/// Fully resolved grading request handed to a strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum CheckJob {
    /// Text answer comparison.
    Text(TextCheckJob),
    /// Compile, run and compare.
    Tests(TestsCheckJob),
    /// Compile, run and judge with a checker program.
    Custom(CustomCheckJob),
}

impl CheckJob {
    /// Returns the route this job belongs to.
    #[must_use]
    pub const fn route(&self) -> Route {
        match self {
            Self::Text(_) => Route::Text,
            Self::Tests(_) => Route::Tests,
            Self::Custom(_) => Route::Custom,
        }
    }

    /// Returns the attempt being graded.
    #[must_use]
    pub const fn attempt(&self) -> &AttemptSpec {
        match self {
            Self::Text(job) => &job.attempt,
            Self::Tests(job) => &job.attempt,
            Self::Custom(job) => &job.run.attempt,
        }
    }

    /// Returns the number of graded tests.
    #[must_use]
    pub fn test_count(&self) -> usize {
        match self {
            Self::Text(job) => job.expected.len(),
            Self::Tests(job) => job.groups.test_count(),
            Self::Custom(job) => job.run.groups.test_count(),
        }
    }
}

/// Verdicts and logs produced by a strategy.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckReport {
    /// One verdict per graded test, in result order.
    pub verdicts: Vec<Verdict>,
    /// Free-form log lines.
    #[serde(default)]
    pub logs: Vec<String>,
}

impl CheckReport {
    /// Creates a report.
    #[must_use]
    pub const fn new(verdicts: Vec<Verdict>, logs: Vec<String>) -> Self {
        Self { verdicts, logs }
    }
}

/// Grading strategy contract.
#[async_trait]
pub trait Checker: Send + Sync {
    /// Grades one attempt.
    async fn check(&self, job: &CheckJob) -> CheckerResult<CheckReport>;
}

/// Errors returned by grading strategies.
#[derive(Debug, Clone, Error)]
pub enum CheckerError {
    /// The strategy exited unsuccessfully.
    #[error("checker exited with {status}: {stderr}")]
    Exited {
        /// Exit status description.
        status: String,
        /// Captured standard error.
        stderr: String,
    },

    /// The strategy produced output that could not be decoded.
    #[error("checker protocol error: {0}")]
    Protocol(Arc<dyn std::error::Error + Send + Sync>),

    /// Generic runtime failure.
    #[error("checker runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl CheckerError {
    /// Wraps an output decoding failure.
    pub fn protocol(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Protocol(Arc::new(err))
    }

    /// Wraps a runtime failure.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
