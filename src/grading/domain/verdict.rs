//! Per-test verdict codes.

use super::ParseVerdictError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a single test.
///
/// Verdicts are persisted and exchanged with strategies as integer codes.
/// Code `0` is the only success value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Verdict {
    /// The test passed.
    Ok,
    /// The program produced a wrong answer.
    WrongAnswer,
    /// The program exceeded its time limit.
    TimeLimitExceeded,
    /// The program exceeded its memory limit.
    MemoryLimitExceeded,
    /// The program terminated abnormally.
    RuntimeError,
    /// The program failed to compile.
    CompilationError,
    /// The answer is correct up to formatting.
    PresentationError,
    /// Grading failed for reasons outside the submission.
    SystemError,
    /// The test was never run.
    NotTested,
}

impl Verdict {
    /// Returns the integer code used in storage and strategy reports.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::WrongAnswer => 1,
            Self::TimeLimitExceeded => 2,
            Self::MemoryLimitExceeded => 3,
            Self::RuntimeError => 4,
            Self::CompilationError => 5,
            Self::PresentationError => 6,
            Self::SystemError => 7,
            Self::NotTested => 8,
        }
    }

    /// Returns the short judge abbreviation.
    #[must_use]
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::WrongAnswer => "WA",
            Self::TimeLimitExceeded => "TL",
            Self::MemoryLimitExceeded => "ML",
            Self::RuntimeError => "RE",
            Self::CompilationError => "CE",
            Self::PresentationError => "PE",
            Self::SystemError => "SE",
            Self::NotTested => "NT",
        }
    }

    /// Returns `true` for the success verdict.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Builds a uniform verdict list of the given length.
    #[must_use]
    pub fn uniform(self, count: usize) -> Vec<Self> {
        vec![self; count]
    }
}

impl TryFrom<i32> for Verdict {
    type Error = ParseVerdictError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Ok),
            1 => Ok(Self::WrongAnswer),
            2 => Ok(Self::TimeLimitExceeded),
            3 => Ok(Self::MemoryLimitExceeded),
            4 => Ok(Self::RuntimeError),
            5 => Ok(Self::CompilationError),
            6 => Ok(Self::PresentationError),
            7 => Ok(Self::SystemError),
            8 => Ok(Self::NotTested),
            other => Err(ParseVerdictError(other)),
        }
    }
}

impl From<Verdict> for i32 {
    fn from(value: Verdict) -> Self {
        value.code()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}
