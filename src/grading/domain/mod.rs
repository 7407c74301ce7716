//! Domain model for attempt grading.
//!
//! The grading domain models attempts, their grading-job descriptors, task
//! test layouts, verdict aggregation and the per-user standings merge while
//! keeping all infrastructure concerns outside of the domain boundary.

mod attempt;
mod error;
mod ids;
mod job;
mod language;
mod standings;
mod status;
mod task;
mod verdict;

pub use attempt::{
    Attempt, AttemptResult, Constraints, FinalVerdict, FinishedAttempt, PersistedAttemptData,
};
pub use error::{GradingDomainError, ParseAttemptStatusError, ParseVerdictError};
pub use ids::{AttemptSpec, LanguageSpec, TaskSpec, TestSpec, UserLogin};
pub use job::{CheckType, CheckerProgram, GradingJob, Route, TaskType};
pub use language::{ExecutionLimits, Language};
pub use standings::{AttemptSnapshot, StandingsPlan, StandingsWrite, UserTaskResult, percent_tests};
pub use status::AttemptStatus;
pub use task::{GroupId, GroupedTests, TaskLayout, TaskTest, TestGroup};
pub use verdict::Verdict;
