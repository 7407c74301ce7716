//! Entry point of one grading pass.
//!
//! A pass loads the attempt, resolves its route, then runs the supervised
//! handler: claim the attempt, build the strategy job, run the strategy and
//! record the outcome. Loading and route errors happen before any claim and
//! are returned to the caller; everything after is contained by the
//! [`FailureSupervisor`].

use super::{
    AttemptLoader, CheckerSet, DispatchError, FailureSupervisor, LanguageResolver, LeaseManager,
    LoadError, LoadedAttempt, PersistError, ResultPersister, resolve_route,
};
use crate::grading::{
    adapters::{ProgramWorkspace, WorkspaceError},
    domain::{
        Attempt, AttemptSpec, ExecutionLimits, FinalVerdict, GroupedTests, Language, LanguageSpec,
        Route, TaskSpec, UserLogin, Verdict,
    },
    ports::{
        AlertSink, CheckJob, CheckerError, CustomCheckJob, GradingStore, GradingStoreError,
        TestsCheckJob, TextCheckJob,
    },
};
use camino::Utf8PathBuf;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Log line recorded when another pass already claimed the attempt.
pub const LEASE_LOST_LOG: &str = "Error in setting testing status";

/// Log line recorded when a custom-checker job carries no checker.
pub const MISSING_CHECKER_LOG: &str = "custom checker is not configured";

/// Errors raised before grading starts; the attempt is left untouched.
#[derive(Debug, Error)]
pub enum GradingError {
    /// A referenced record is missing or unreadable.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// The job names an unknown strategy.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Failures inside a supervised grading handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Storage failed outside the result writes.
    #[error(transparent)]
    Store(#[from] GradingStoreError),
    /// Recording the outcome failed.
    #[error(transparent)]
    Persist(#[from] PersistError),
    /// The strategy failed.
    #[error(transparent)]
    Checker(#[from] CheckerError),
    /// The program workspace could not be created.
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    /// A language needed for the run is not configured.
    #[error("language {0} is not configured")]
    MissingLanguage(LanguageSpec),
}

/// How a grading pass ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradingOutcome {
    /// The strategy ran and its verdicts were recorded.
    Graded(FinalVerdict),
    /// Another pass owns the attempt; not-tested verdicts were recorded.
    LeaseLost,
    /// The custom-checker job had no checker; not-tested verdicts were
    /// recorded.
    CheckerMissing,
    /// Grading failed; system-error verdicts were recorded.
    SystemError {
        /// Failure description.
        cause: String,
    },
    /// Grading failed and so did recording the system error.
    Unsaved {
        /// Failure description.
        cause: String,
        /// Description of the failed save.
        save_error: String,
    },
}

/// Immutable settings of a [`GradingManager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerSettings {
    /// Directory under which program workspaces are created.
    pub workspace_root: Utf8PathBuf,
}

impl ManagerSettings {
    /// Creates settings.
    #[must_use]
    pub fn new(workspace_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
        }
    }
}

/// Grading orchestrator.
///
/// Holds only immutable collaborators, so one instance can serve any number
/// of sequential or concurrent passes over different attempts.
pub struct GradingManager<S, L, K>
where
    S: GradingStore,
    L: AlertSink,
    K: Clock + Send + Sync,
{
    loader: AttemptLoader<S>,
    lease: LeaseManager<S>,
    resolver: LanguageResolver<S>,
    persister: Arc<ResultPersister<S>>,
    supervisor: FailureSupervisor<S, L, K>,
    checkers: CheckerSet,
    settings: ManagerSettings,
}

impl<S, L, K> GradingManager<S, L, K>
where
    S: GradingStore,
    L: AlertSink,
    K: Clock + Send + Sync,
{
    /// Wires a manager over one store.
    #[must_use]
    pub fn new(
        store: Arc<S>,
        checkers: CheckerSet,
        alerts: Arc<L>,
        clock: Arc<K>,
        settings: ManagerSettings,
    ) -> Self {
        let persister = Arc::new(ResultPersister::new(Arc::clone(&store)));
        Self {
            loader: AttemptLoader::new(Arc::clone(&store)),
            lease: LeaseManager::new(Arc::clone(&store)),
            resolver: LanguageResolver::new(store),
            supervisor: FailureSupervisor::new(Arc::clone(&persister), alerts, clock),
            persister,
            checkers,
            settings,
        }
    }

    /// Runs one grading pass for `attempt` by `author` on `task`.
    ///
    /// # Errors
    ///
    /// Returns [`GradingError`] when loading fails or the job's routing codes
    /// are unknown. Failures after that point are contained and reported
    /// through [`GradingOutcome`].
    #[instrument(skip_all, fields(attempt = %attempt, author = %author, task = %task))]
    pub async fn start(
        &self,
        attempt: &AttemptSpec,
        author: &UserLogin,
        task: &TaskSpec,
    ) -> Result<GradingOutcome, GradingError> {
        let loaded = self.loader.load(attempt, task).await?;
        let route = resolve_route(&loaded.job)?;
        info!(route = %route, "dispatching attempt");

        let pristine = loaded.attempt.clone();
        let outcome = self
            .supervisor
            .supervise(&pristine, author, task, self.handle(route, loaded, author, task))
            .await;
        info!(outcome = ?outcome, "grading pass finished");
        Ok(outcome)
    }

    async fn handle(
        &self,
        route: Route,
        loaded: LoadedAttempt,
        author: &UserLogin,
        task: &TaskSpec,
    ) -> Result<GradingOutcome, HandlerError> {
        let grouped = loaded.grouped_tests();
        let LoadedAttempt {
            mut attempt,
            job,
            tests,
            groups,
        } = loaded;

        if !self.lease.try_claim(attempt.spec()).await? {
            self.record_not_tested(&mut attempt, author, task, LEASE_LOST_LOG)
                .await?;
            return Ok(GradingOutcome::LeaseLost);
        }

        let (check_job, workspace) = match route {
            Route::Text => {
                let text_job = TextCheckJob {
                    attempt: attempt.spec().clone(),
                    answers: attempt.text_answers().to_vec(),
                    expected: tests.into_iter().map(|test| test.output_data).collect(),
                    groups,
                };
                (CheckJob::Text(text_job), None)
            }
            Route::Tests => {
                let language = self.resolver.resolve(attempt.language()).await?;
                let directory = self.open_workspace(&attempt)?;
                let run = run_job(&attempt, language, grouped, &directory);
                (CheckJob::Tests(run), Some(directory))
            }
            Route::Custom => {
                let Some(checker) = job.checker else {
                    warn!(attempt = %attempt.spec(), "custom checker job has no checker");
                    self.record_not_tested(&mut attempt, author, task, MISSING_CHECKER_LOG)
                        .await?;
                    return Ok(GradingOutcome::CheckerMissing);
                };
                let (language, checker_language) = self
                    .resolver
                    .resolve_pair(attempt.language(), &checker.language)
                    .await?;
                let directory = self.open_workspace(&attempt)?;
                let custom_job = CustomCheckJob {
                    run: run_job(&attempt, language, grouped, &directory),
                    checker,
                    checker_language,
                };
                (CheckJob::Custom(custom_job), Some(directory))
            }
        };

        let report = self.checkers.for_route(route).check(&check_job).await?;
        if let Some(directory) = workspace {
            if let Err(err) = directory.release() {
                warn!(error = %err, "failed to release program workspace");
            }
        }

        let outcome = self
            .persister
            .save(&mut attempt, author, task, &report.verdicts, report.logs)
            .await?;
        Ok(GradingOutcome::Graded(outcome))
    }

    fn open_workspace(&self, attempt: &Attempt) -> Result<ProgramWorkspace, WorkspaceError> {
        ProgramWorkspace::create(&self.settings.workspace_root, attempt.spec())
    }

    async fn record_not_tested(
        &self,
        attempt: &mut Attempt,
        author: &UserLogin,
        task: &TaskSpec,
        log: &str,
    ) -> Result<(), PersistError> {
        let verdicts = Verdict::NotTested.uniform(attempt.results().len());
        self.persister
            .save(attempt, author, task, &verdicts, vec![log.to_owned()])
            .await?;
        Ok(())
    }
}

fn run_job(
    attempt: &Attempt,
    language: Language,
    groups: GroupedTests,
    workspace: &ProgramWorkspace,
) -> TestsCheckJob {
    TestsCheckJob {
        attempt: attempt.spec().clone(),
        program: attempt.program().map(str::to_owned),
        limits: ExecutionLimits::resolve(attempt.constraints(), &language),
        language,
        groups,
        workspace: workspace.path().to_owned(),
    }
}
