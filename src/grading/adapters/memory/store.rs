//! In-memory grading store for service tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::grading::{
    domain::{
        Attempt, AttemptSnapshot, AttemptSpec, AttemptStatus, FinishedAttempt, GradingJob,
        Language, LanguageSpec, TaskLayout, TaskSpec, TaskTest, TestSpec, UserLogin,
        UserTaskResult,
    },
    ports::{
        AttemptRepository, CatalogRepository, GradingStoreError, GradingStoreResult,
        StandingsRepository,
    },
};

/// Write operation of the in-memory store that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreWrite {
    /// Conditional attempt status change.
    TransitionStatus,
    /// Status mirror update.
    StatusMirror,
    /// Terminal attempt write.
    FinishAttempt,
    /// Grading-job deletion.
    DeleteJob,
    /// Standings insert or append.
    Standings,
    /// Rating increment.
    Rating,
}

/// Thread-safe in-memory implementation of every grading storage port.
///
/// Status changes are atomic under a single lock, so concurrent claims of the
/// same attempt observe exactly one winner.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGradingStore {
    state: Arc<RwLock<InMemoryGradingState>>,
}

#[derive(Debug, Default)]
struct InMemoryGradingState {
    attempts: HashMap<AttemptSpec, Attempt>,
    jobs: HashMap<AttemptSpec, GradingJob>,
    mirrors: HashMap<AttemptSpec, AttemptStatus>,
    layouts: HashMap<TaskSpec, TaskLayout>,
    tests: HashMap<TestSpec, TaskTest>,
    languages: HashMap<LanguageSpec, Language>,
    standings: HashMap<(UserLogin, TaskSpec), UserTaskResult>,
    ratings: HashMap<UserLogin, u64>,
    failing: HashSet<StoreWrite>,
}

impl InMemoryGradingState {
    fn check_write(&self, write: StoreWrite) -> GradingStoreResult<()> {
        if self.failing.contains(&write) {
            return Err(GradingStoreError::persistence(std::io::Error::other(
                format!("injected failure for {write:?}"),
            )));
        }
        Ok(())
    }
}

fn lock_error(err: impl std::fmt::Display) -> GradingStoreError {
    GradingStoreError::persistence(std::io::Error::other(err.to_string()))
}

impl InMemoryGradingStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> GradingStoreResult<RwLockReadGuard<'_, InMemoryGradingState>> {
        self.state.read().map_err(lock_error)
    }

    fn write(&self) -> GradingStoreResult<RwLockWriteGuard<'_, InMemoryGradingState>> {
        self.state.write().map_err(lock_error)
    }

    /// Stores an attempt, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns persistence errors when lock acquisition fails.
    pub fn seed_attempt(&self, attempt: Attempt) -> GradingStoreResult<()> {
        let mut state = self.write()?;
        state.attempts.insert(attempt.spec().clone(), attempt);
        Ok(())
    }

    /// Queues a grading job and creates its pending status mirror.
    ///
    /// # Errors
    ///
    /// Returns persistence errors when lock acquisition fails.
    pub fn seed_grading_job(&self, job: GradingJob) -> GradingStoreResult<()> {
        let mut state = self.write()?;
        state
            .mirrors
            .insert(job.attempt.clone(), AttemptStatus::Pending);
        state.jobs.insert(job.attempt.clone(), job);
        Ok(())
    }

    /// Stores a task layout.
    ///
    /// # Errors
    ///
    /// Returns persistence errors when lock acquisition fails.
    pub fn seed_task_layout(&self, layout: TaskLayout) -> GradingStoreResult<()> {
        let mut state = self.write()?;
        state.layouts.insert(layout.spec.clone(), layout);
        Ok(())
    }

    /// Stores test cases.
    ///
    /// # Errors
    ///
    /// Returns persistence errors when lock acquisition fails.
    pub fn seed_tests(&self, tests: impl IntoIterator<Item = TaskTest>) -> GradingStoreResult<()> {
        let mut state = self.write()?;
        for test in tests {
            state.tests.insert(test.spec.clone(), test);
        }
        Ok(())
    }

    /// Stores a language configuration.
    ///
    /// # Errors
    ///
    /// Returns persistence errors when lock acquisition fails.
    pub fn seed_language(&self, language: Language) -> GradingStoreResult<()> {
        let mut state = self.write()?;
        state.languages.insert(language.spec.clone(), language);
        Ok(())
    }

    /// Stores a user-task aggregate, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns persistence errors when lock acquisition fails.
    pub fn seed_user_task_result(&self, result: UserTaskResult) -> GradingStoreResult<()> {
        let mut state = self.write()?;
        state
            .standings
            .insert((result.user.clone(), result.task.clone()), result);
        Ok(())
    }

    /// Makes every later `write` operation fail with a persistence error.
    ///
    /// # Errors
    ///
    /// Returns persistence errors when lock acquisition fails.
    pub fn fail_writes(&self, write: StoreWrite) -> GradingStoreResult<()> {
        let mut state = self.write()?;
        state.failing.insert(write);
        Ok(())
    }

    /// Returns the status mirror of an attempt.
    ///
    /// # Errors
    ///
    /// Returns persistence errors when lock acquisition fails.
    pub fn status_mirror(
        &self,
        attempt: &AttemptSpec,
    ) -> GradingStoreResult<Option<AttemptStatus>> {
        Ok(self.read()?.mirrors.get(attempt).copied())
    }
}

#[async_trait]
impl AttemptRepository for InMemoryGradingStore {
    async fn find_attempt(&self, spec: &AttemptSpec) -> GradingStoreResult<Option<Attempt>> {
        Ok(self.read()?.attempts.get(spec).cloned())
    }

    async fn find_grading_job(
        &self,
        attempt: &AttemptSpec,
    ) -> GradingStoreResult<Option<GradingJob>> {
        Ok(self.read()?.jobs.get(attempt).cloned())
    }

    async fn transition_status(
        &self,
        spec: &AttemptSpec,
        from: AttemptStatus,
        to: AttemptStatus,
    ) -> GradingStoreResult<u64> {
        let mut state = self.write()?;
        state.check_write(StoreWrite::TransitionStatus)?;
        let Some(attempt) = state.attempts.get_mut(spec) else {
            return Ok(0);
        };
        if attempt.status() != from {
            return Ok(0);
        }
        attempt
            .advance_status(to)
            .map_err(GradingStoreError::invalid_persisted_data)?;
        Ok(1)
    }

    async fn set_status_mirror(
        &self,
        attempt: &AttemptSpec,
        status: AttemptStatus,
    ) -> GradingStoreResult<u64> {
        let mut state = self.write()?;
        state.check_write(StoreWrite::StatusMirror)?;
        match state.mirrors.get_mut(attempt) {
            Some(mirror) if *mirror != status => {
                *mirror = status;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn finish_attempt(
        &self,
        spec: &AttemptSpec,
        finished: &FinishedAttempt,
    ) -> GradingStoreResult<()> {
        let mut state = self.write()?;
        state.check_write(StoreWrite::FinishAttempt)?;
        if let Some(attempt) = state.attempts.get_mut(spec) {
            attempt.finish(finished);
        }
        Ok(())
    }

    async fn delete_grading_job(&self, attempt: &AttemptSpec) -> GradingStoreResult<()> {
        let mut state = self.write()?;
        state.check_write(StoreWrite::DeleteJob)?;
        state.jobs.remove(attempt);
        Ok(())
    }
}

#[async_trait]
impl CatalogRepository for InMemoryGradingStore {
    async fn find_task_layout(&self, task: &TaskSpec) -> GradingStoreResult<Option<TaskLayout>> {
        Ok(self.read()?.layouts.get(task).cloned())
    }

    async fn find_tests(&self, specs: &[TestSpec]) -> GradingStoreResult<Vec<TaskTest>> {
        let state = self.read()?;
        Ok(specs
            .iter()
            .filter_map(|spec| state.tests.get(spec).cloned())
            .collect())
    }

    async fn find_language(&self, spec: &LanguageSpec) -> GradingStoreResult<Option<Language>> {
        Ok(self.read()?.languages.get(spec).cloned())
    }
}

#[async_trait]
impl StandingsRepository for InMemoryGradingStore {
    async fn find_user_task_result(
        &self,
        user: &UserLogin,
        task: &TaskSpec,
    ) -> GradingStoreResult<Option<UserTaskResult>> {
        let state = self.read()?;
        Ok(state
            .standings
            .get(&(user.clone(), task.clone()))
            .cloned())
    }

    async fn insert_user_task_result(&self, result: &UserTaskResult) -> GradingStoreResult<()> {
        let mut state = self.write()?;
        state.check_write(StoreWrite::Standings)?;
        let key = (result.user.clone(), result.task.clone());
        if state.standings.contains_key(&key) {
            return Err(GradingStoreError::persistence(std::io::Error::other(
                format!("results of {} on {} already exist", result.user, result.task),
            )));
        }
        state.standings.insert(key, result.clone());
        Ok(())
    }

    async fn append_user_task_result(
        &self,
        user: &UserLogin,
        task: &TaskSpec,
        current: &AttemptSnapshot,
        best: &AttemptSnapshot,
    ) -> GradingStoreResult<()> {
        let mut state = self.write()?;
        state.check_write(StoreWrite::Standings)?;
        if let Some(result) = state.standings.get_mut(&(user.clone(), task.clone())) {
            result.push(current.clone(), best.clone());
        }
        Ok(())
    }

    async fn increment_rating(&self, user: &UserLogin) -> GradingStoreResult<()> {
        let mut state = self.write()?;
        state.check_write(StoreWrite::Rating)?;
        let score = state.ratings.entry(user.clone()).or_default();
        *score = score.saturating_add(1);
        Ok(())
    }

    async fn find_rating(&self, user: &UserLogin) -> GradingStoreResult<Option<u64>> {
        Ok(self.read()?.ratings.get(user).copied())
    }
}
