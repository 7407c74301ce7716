//! Diesel row models for grading persistence.

use super::schema::{
    attempts, grading_jobs, languages, ratings, task_tests, tasks, user_task_results,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for attempts.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = attempts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AttemptRow {
    /// Attempt identifier.
    pub spec: String,
    /// Author login.
    pub author: String,
    /// Program language identifier.
    pub language: String,
    /// Constraints JSON payload.
    pub constraints: Value,
    /// Lifecycle status.
    pub status: String,
    /// Submission timestamp.
    pub date: DateTime<Utc>,
    /// Result slots JSON payload.
    pub results: Value,
    /// Text answers JSON payload.
    pub text_answers: Value,
    /// Program source.
    pub program: Option<String>,
    /// Final verdict code.
    pub verdict: Option<i32>,
    /// Final verdict test index.
    pub verdict_test: Option<i32>,
    /// Log bundle JSON payload.
    pub logs: Value,
}

/// Query result row for grading jobs.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = grading_jobs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GradingJobRow {
    /// Attempt identifier.
    pub attempt: String,
    /// Raw task-type routing code.
    pub task_type: i32,
    /// Raw check-type routing code.
    pub task_check_type: i32,
    /// Checker program JSON payload.
    pub checker: Option<Value>,
}

/// Query result row for task layouts.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskLayoutRow {
    /// Task identifier.
    pub spec: String,
    /// Test identifiers JSON payload.
    pub tests: Value,
    /// Test groups JSON payload.
    pub test_groups: Value,
}

/// Query result row for task tests.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_tests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskTestRow {
    /// Test identifier.
    pub spec: String,
    /// Program input.
    pub input_data: String,
    /// Expected output.
    pub output_data: String,
}

/// Query result row for languages.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = languages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LanguageRow {
    /// Language identifier.
    pub spec: String,
    /// Compilation time limit in milliseconds.
    pub compile_offset_ms: i32,
    /// Extra run time in milliseconds.
    pub run_offset_ms: i32,
    /// Extra memory in megabytes.
    pub memory_offset_mb: i32,
}

/// Query result row for user task history.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_task_results)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserTaskResultRow {
    /// User login.
    pub user_login: String,
    /// Task identifier.
    pub task: String,
    /// Results JSON payload.
    pub results: Value,
    /// Bests JSON payload.
    pub bests: Value,
}

/// Insert model for user task history.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_task_results)]
pub struct NewUserTaskResultRow {
    /// User login.
    pub user_login: String,
    /// Task identifier.
    pub task: String,
    /// Results JSON payload.
    pub results: Value,
    /// Bests JSON payload.
    pub bests: Value,
}

/// Insert model for ratings.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ratings)]
pub struct NewRatingRow {
    /// User login.
    pub user_login: String,
    /// Initial score.
    pub score: i64,
}
