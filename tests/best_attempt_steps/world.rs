//! Shared world state for best-attempt BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use arbiter::grading::{
    adapters::memory::{InMemoryGradingStore, RecordingAlertSink, ScriptedChecker},
    domain::{
        Attempt, AttemptSpec, CheckType, GradingJob, Language, LanguageSpec, TaskLayout, TaskSpec,
        TaskTest, TaskType, TestSpec, UserLogin, Verdict,
    },
    services::{CheckerSet, GradingManager, GradingOutcome, ManagerSettings},
};
use camino::Utf8PathBuf;
use chrono::{TimeZone, Utc};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest::fixture;

/// Scenario world for best-attempt behaviour tests.
pub struct BestAttemptWorld {
    pub store: Arc<InMemoryGradingStore>,
    pub alerts: RecordingAlertSink,
    pub tasks: HashMap<String, usize>,
    pub workspace_root: Utf8PathBuf,
    pub last_outcome: Option<GradingOutcome>,
}

impl BestAttemptWorld {
    /// Creates a world over an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryGradingStore::new()),
            alerts: RecordingAlertSink::new(),
            tasks: HashMap::new(),
            workspace_root: Utf8PathBuf::from("target/arbiter-bdd"),
            last_outcome: None,
        }
    }

    /// Seeds a task with `tests` test cases.
    ///
    /// # Errors
    ///
    /// Returns an error if seeding fails.
    pub fn seed_task(&mut self, task: &str, tests: usize) -> eyre::Result<()> {
        let specs = test_specs(tests)?;
        self.store.seed_task_layout(TaskLayout {
            spec: TaskSpec::new(task)?,
            tests: specs.clone(),
            test_groups: Vec::new(),
        })?;
        self.store.seed_tests(
            specs
                .into_iter()
                .map(|spec| TaskTest::new(spec, "1 2", "3")),
        )?;
        self.store
            .seed_language(Language::new(LanguageSpec::new("python3")?, 1000, 0, 0))?;
        self.tasks.insert(task.to_owned(), tests);
        Ok(())
    }

    /// Seeds and grades one attempt with scripted `verdicts`.
    ///
    /// # Errors
    ///
    /// Returns an error if the task is unknown, seeding fails, or the pass
    /// returns an error.
    pub fn grade(
        &mut self,
        user: &str,
        attempt: &str,
        task: &str,
        day: u32,
        verdicts: &str,
    ) -> eyre::Result<()> {
        let tests = *self
            .tasks
            .get(task)
            .ok_or_else(|| eyre::eyre!("task {task} was not seeded"))?;
        let spec = AttemptSpec::new(attempt)?;
        let author = UserLogin::new(user)?;
        let task_spec = TaskSpec::new(task)?;
        let date = Utc
            .with_ymd_and_hms(2026, 4, day, 10, 0, 0)
            .single()
            .ok_or_else(|| eyre::eyre!("invalid day {day}"))?;
        let record = Attempt::new(spec.clone(), author.clone(), LanguageSpec::new("python3")?, date)
            .with_tests(test_specs(tests)?)
            .with_text_answers((0..tests).map(|_| "3".to_owned()));
        self.store.seed_attempt(record)?;
        self.store.seed_grading_job(GradingJob::new(
            spec.clone(),
            TaskType::Text,
            CheckType::TestsChecker,
        ))?;

        let checker = Arc::new(ScriptedChecker::reporting(parse_verdicts(verdicts)?));
        let manager = GradingManager::new(
            Arc::clone(&self.store),
            CheckerSet::new(Arc::clone(&checker) as _, Arc::clone(&checker) as _, checker),
            Arc::new(self.alerts.clone()),
            Arc::new(DefaultClock),
            ManagerSettings::new(self.workspace_root.clone()),
        );
        let outcome = run_async(manager.start(&spec, &author, &task_spec))
            .wrap_err_with(|| format!("grade attempt {attempt}"))?;
        self.last_outcome = Some(outcome);
        Ok(())
    }
}

impl Default for BestAttemptWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BestAttemptWorld {
    BestAttemptWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

fn test_specs(count: usize) -> eyre::Result<Vec<TestSpec>> {
    (1..=count)
        .map(|index| TestSpec::new(format!("t{index}")).map_err(eyre::Report::from))
        .collect()
}

/// Parses space-separated verdict abbreviations such as `OK WA TL`.
///
/// # Errors
///
/// Returns an error for an unknown abbreviation.
pub fn parse_verdicts(verdicts: &str) -> eyre::Result<Vec<Verdict>> {
    verdicts
        .split_whitespace()
        .map(|word| {
            (0..=8)
                .filter_map(|code| Verdict::try_from(code).ok())
                .find(|verdict| verdict.abbreviation() == word)
                .ok_or_else(|| eyre::eyre!("unknown verdict {word}"))
        })
        .collect()
}
