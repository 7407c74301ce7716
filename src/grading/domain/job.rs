//! Grading-job descriptors and routing keys.

use super::{AttemptSpec, LanguageSpec};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of task an attempt was submitted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Program task graded by running code.
    Code,
    /// Free-text task graded by answer comparison.
    Text,
}

impl TaskType {
    /// Decodes the stored routing code.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Code),
            1 => Some(Self::Text),
            _ => None,
        }
    }

    /// Returns the stored routing code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Code => 0,
            Self::Text => 1,
        }
    }
}

/// How a code task decides verdicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckType {
    /// Output compared against the expected test output.
    TestsChecker,
    /// Output judged by a task-supplied checker program.
    CustomChecker,
}

impl CheckType {
    /// Decodes the stored routing code.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::TestsChecker),
            1 => Some(Self::CustomChecker),
            _ => None,
        }
    }

    /// Returns the stored routing code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::TestsChecker => 0,
            Self::CustomChecker => 1,
        }
    }
}

/// Grading strategy selected for an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Text answer comparison.
    Text,
    /// Sandboxed compile, run and compare.
    Tests,
    /// Sandboxed run judged by a custom checker program.
    Custom,
}

impl Route {
    /// Returns the canonical name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Tests => "tests",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checker program embedded in a custom-checker job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckerProgram {
    /// Language the checker is written in.
    pub language: LanguageSpec,
    /// Checker source code.
    pub source: String,
}

/// Transient descriptor marking an attempt as queued or in flight.
///
/// Routing codes are kept raw so that the dispatcher can reject unknown
/// values with a named error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingJob {
    /// Attempt this job grades.
    pub attempt: AttemptSpec,
    /// Raw task-type routing code.
    pub task_type: i32,
    /// Raw check-type routing code.
    pub task_check_type: i32,
    /// Checker program for custom-checker jobs.
    #[serde(default)]
    pub checker: Option<CheckerProgram>,
}

impl GradingJob {
    /// Creates a job for a routed attempt.
    #[must_use]
    pub const fn new(attempt: AttemptSpec, task_type: TaskType, check_type: CheckType) -> Self {
        Self {
            attempt,
            task_type: task_type.code(),
            task_check_type: check_type.code(),
            checker: None,
        }
    }

    /// Attaches a checker program.
    #[must_use]
    pub fn with_checker(mut self, checker: CheckerProgram) -> Self {
        self.checker = Some(checker);
        self
    }
}
