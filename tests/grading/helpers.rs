//! Shared builders for grading integration tests.

use std::sync::Arc;

use arbiter::grading::{
    adapters::memory::{InMemoryGradingStore, RecordingAlertSink},
    domain::{
        Attempt, AttemptSpec, CheckType, Constraints, GradingJob, Language, LanguageSpec,
        TaskLayout, TaskSpec, TaskTest, TaskType, TestSpec, UserLogin,
    },
    ports::{AttemptRepository, Checker},
    services::{CheckerSet, GradingManager, ManagerSettings},
};
use camino::Utf8PathBuf;
use chrono::{DateTime, TimeZone, Utc};
use mockable::DefaultClock;

/// Manager wired to the in-memory adapters.
pub type TestManager = GradingManager<InMemoryGradingStore, RecordingAlertSink, DefaultClock>;

/// Identifiers of one seeded attempt.
#[derive(Debug, Clone)]
pub struct Submission {
    /// Attempt identifier.
    pub attempt: AttemptSpec,
    /// Author login.
    pub author: UserLogin,
    /// Task identifier.
    pub task: TaskSpec,
}

/// Builds the test identifiers `t1` to `t{count}`.
///
/// # Errors
///
/// Returns an error if the identifier is blank.
pub fn test_specs(count: usize) -> eyre::Result<Vec<TestSpec>> {
    (1..=count)
        .map(|index| TestSpec::new(format!("t{index}")).map_err(eyre::Report::from))
        .collect()
}

/// Returns a fixed submission date on the given day of March 2026.
///
/// # Errors
///
/// Returns an error if the day is out of range.
pub fn day(number: u32) -> eyre::Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(2026, 3, number, 9, 0, 0)
        .single()
        .ok_or_else(|| eyre::eyre!("invalid day {number}"))
}

/// Task seeded into a store.
#[derive(Debug, Clone)]
pub struct SeededTask {
    /// Task identifier.
    pub spec: TaskSpec,
    /// Number of test cases.
    pub tests: usize,
}

/// Seeds a task with `tests` test cases and a `python3` language.
///
/// # Errors
///
/// Returns an error if seeding fails.
pub fn seed_task(
    store: &InMemoryGradingStore,
    task: &str,
    tests: usize,
) -> eyre::Result<SeededTask> {
    let spec = TaskSpec::new(task)?;
    store.seed_task_layout(TaskLayout {
        spec: spec.clone(),
        tests: test_specs(tests)?,
        test_groups: Vec::new(),
    })?;
    let cases = test_specs(tests)?
        .into_iter()
        .enumerate()
        .map(|(index, test)| TaskTest::new(test, format!("{index}"), format!("{index}")));
    store.seed_tests(cases)?;
    store.seed_language(Language::new(LanguageSpec::new("python3")?, 1000, 50, 8))?;
    Ok(SeededTask { spec, tests })
}

/// Seeds a queued attempt by `author` on `task`, submitted on `date`.
///
/// # Errors
///
/// Returns an error if seeding fails.
pub fn seed_attempt(
    store: &InMemoryGradingStore,
    attempt: &str,
    author: &str,
    task: &SeededTask,
    route: (TaskType, CheckType),
    date: DateTime<Utc>,
) -> eyre::Result<Submission> {
    let spec = AttemptSpec::new(attempt)?;
    let login = UserLogin::new(author)?;
    let tests = test_specs(task.tests)?;
    let record = Attempt::new(spec.clone(), login.clone(), LanguageSpec::new("python3")?, date)
        .with_constraints(Constraints {
            time_ms: Some(500),
            memory_mb: Some(32),
        })
        .with_text_answers((0..tests.len()).map(|index| format!("{index}")))
        .with_tests(tests)
        .with_program("print(input())");
    store.seed_attempt(record)?;
    store.seed_grading_job(GradingJob::new(spec.clone(), route.0, route.1))?;
    Ok(Submission {
        attempt: spec,
        author: login,
        task: task.spec.clone(),
    })
}

/// Builds a manager that sends every route to `checker`.
pub fn manager(
    store: &Arc<InMemoryGradingStore>,
    checker: Arc<dyn Checker>,
    alerts: &RecordingAlertSink,
    workspace_root: Utf8PathBuf,
) -> TestManager {
    GradingManager::new(
        Arc::clone(store),
        CheckerSet::new(Arc::clone(&checker), Arc::clone(&checker), checker),
        Arc::new(alerts.clone()),
        Arc::new(DefaultClock),
        ManagerSettings::new(workspace_root),
    )
}

/// Creates a temporary workspace root.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not UTF-8.
pub fn workspace_root() -> eyre::Result<(tempfile::TempDir, Utf8PathBuf)> {
    let dir = tempfile::tempdir()?;
    let root = Utf8PathBuf::from_path_buf(dir.path().join("runs"))
        .map_err(|path| eyre::eyre!("non UTF-8 temp path {}", path.display()))?;
    Ok((dir, root))
}

/// Reads an attempt back from the store.
///
/// # Errors
///
/// Returns an error if the attempt is missing or the read fails.
pub async fn stored_attempt(
    store: &InMemoryGradingStore,
    attempt: &AttemptSpec,
) -> eyre::Result<Attempt> {
    store
        .find_attempt(attempt)
        .await?
        .ok_or_else(|| eyre::eyre!("attempt {attempt} missing"))
}
