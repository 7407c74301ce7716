//! Error types for grading domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or combining grading domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GradingDomainError {
    /// An identifier was empty after trimming.
    #[error("{0} identifier must not be empty")]
    EmptyIdentifier(&'static str),

    /// A strategy returned a different number of verdicts than the attempt
    /// has result slots.
    #[error("expected {expected} verdicts, strategy returned {actual}")]
    VerdictCountMismatch {
        /// Number of result slots on the attempt.
        expected: usize,
        /// Number of verdicts returned.
        actual: usize,
    },

    /// A test group references a test index outside the task.
    #[error("test group {group} references test #{index}, task has {total} tests")]
    TestGroupOutOfRange {
        /// Offending group identifier.
        group: u32,
        /// Zero-based test index referenced by the group.
        index: usize,
        /// Number of tests defined on the task.
        total: usize,
    },

    /// Two test groups claim the same test index.
    #[error("test #{index} belongs to more than one test group")]
    OverlappingTestGroups {
        /// Zero-based test index claimed twice.
        index: usize,
    },

    /// An attempt status transition would move backwards.
    #[error("attempt status cannot move from {from} to {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: &'static str,
        /// Requested status.
        to: &'static str,
    },
}

/// Error returned while parsing attempt statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown attempt status: {0}")]
pub struct ParseAttemptStatusError(pub String);

/// Error returned while decoding verdict codes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown verdict code: {0}")]
pub struct ParseVerdictError(pub i32);
