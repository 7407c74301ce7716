//! `PostgreSQL` implementation of the grading storage ports.

use super::{
    models::{
        AttemptRow, GradingJobRow, LanguageRow, NewRatingRow, NewUserTaskResultRow,
        TaskLayoutRow, TaskTestRow, UserTaskResultRow,
    },
    schema::{
        attempts, grading_jobs, languages, ratings, task_tests, tasks, user_task_results,
        user_task_statuses,
    },
};
use crate::grading::{
    domain::{
        Attempt, AttemptSnapshot, AttemptSpec, AttemptStatus, CheckerProgram, FinalVerdict,
        FinishedAttempt, GradingJob, Language, LanguageSpec, PersistedAttemptData, TaskLayout,
        TaskSpec, TaskTest, TestSpec, UserLogin, UserTaskResult, Verdict,
    },
    ports::{
        AttemptRepository, CatalogRepository, GradingStoreError, GradingStoreResult,
        StandingsRepository,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// `PostgreSQL` connection pool type used by grading adapters.
pub type GradingPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed grading store.
#[derive(Debug, Clone)]
pub struct PostgresGradingStore {
    pool: GradingPgPool,
}

impl PostgresGradingStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: GradingPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> GradingStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> GradingStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(GradingStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(GradingStoreError::persistence)?
    }
}

#[async_trait]
impl AttemptRepository for PostgresGradingStore {
    async fn find_attempt(&self, spec: &AttemptSpec) -> GradingStoreResult<Option<Attempt>> {
        let key = spec.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = attempts::table
                .filter(attempts::spec.eq(key))
                .select(AttemptRow::as_select())
                .first::<AttemptRow>(connection)
                .optional()
                .map_err(GradingStoreError::persistence)?;
            row.map(row_to_attempt).transpose()
        })
        .await
    }

    async fn find_grading_job(
        &self,
        attempt: &AttemptSpec,
    ) -> GradingStoreResult<Option<GradingJob>> {
        let key = attempt.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = grading_jobs::table
                .filter(grading_jobs::attempt.eq(key))
                .select(GradingJobRow::as_select())
                .first::<GradingJobRow>(connection)
                .optional()
                .map_err(GradingStoreError::persistence)?;
            row.map(row_to_grading_job).transpose()
        })
        .await
    }

    async fn transition_status(
        &self,
        spec: &AttemptSpec,
        from: AttemptStatus,
        to: AttemptStatus,
    ) -> GradingStoreResult<u64> {
        let key = spec.as_str().to_owned();
        self.run_blocking(move |connection| {
            let modified = diesel::update(
                attempts::table
                    .filter(attempts::spec.eq(key))
                    .filter(attempts::status.eq(from.as_str())),
            )
            .set(attempts::status.eq(to.as_str()))
            .execute(connection)
            .map_err(GradingStoreError::persistence)?;
            u64::try_from(modified).map_err(GradingStoreError::persistence)
        })
        .await
    }

    async fn set_status_mirror(
        &self,
        attempt: &AttemptSpec,
        status: AttemptStatus,
    ) -> GradingStoreResult<u64> {
        let key = attempt.as_str().to_owned();
        self.run_blocking(move |connection| {
            let modified = diesel::update(
                user_task_statuses::table
                    .filter(user_task_statuses::attempt.eq(key))
                    .filter(user_task_statuses::status.ne(status.as_str())),
            )
            .set(user_task_statuses::status.eq(status.as_str()))
            .execute(connection)
            .map_err(GradingStoreError::persistence)?;
            u64::try_from(modified).map_err(GradingStoreError::persistence)
        })
        .await
    }

    async fn finish_attempt(
        &self,
        spec: &AttemptSpec,
        finished: &FinishedAttempt,
    ) -> GradingStoreResult<()> {
        let key = spec.as_str().to_owned();
        let results = to_json(&finished.results)?;
        let logs = to_json(&finished.logs)?;
        let verdict = finished.verdict.code();
        let verdict_test =
            i32::try_from(finished.verdict_test).map_err(GradingStoreError::persistence)?;

        self.run_blocking(move |connection| {
            diesel::update(attempts::table.filter(attempts::spec.eq(key)))
                .set((
                    attempts::status.eq(AttemptStatus::Finished.as_str()),
                    attempts::results.eq(results),
                    attempts::verdict.eq(Some(verdict)),
                    attempts::verdict_test.eq(Some(verdict_test)),
                    attempts::logs.eq(logs),
                ))
                .execute(connection)
                .map_err(GradingStoreError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn delete_grading_job(&self, attempt: &AttemptSpec) -> GradingStoreResult<()> {
        let key = attempt.as_str().to_owned();
        self.run_blocking(move |connection| {
            diesel::delete(grading_jobs::table.filter(grading_jobs::attempt.eq(key)))
                .execute(connection)
                .map_err(GradingStoreError::persistence)?;
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl CatalogRepository for PostgresGradingStore {
    async fn find_task_layout(&self, task: &TaskSpec) -> GradingStoreResult<Option<TaskLayout>> {
        let key = task.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::spec.eq(key))
                .select(TaskLayoutRow::as_select())
                .first::<TaskLayoutRow>(connection)
                .optional()
                .map_err(GradingStoreError::persistence)?;
            row.map(row_to_task_layout).transpose()
        })
        .await
    }

    async fn find_tests(&self, specs: &[TestSpec]) -> GradingStoreResult<Vec<TaskTest>> {
        let keys: Vec<String> = specs.iter().map(|spec| spec.as_str().to_owned()).collect();
        self.run_blocking(move |connection| {
            let rows = task_tests::table
                .filter(task_tests::spec.eq_any(keys))
                .select(TaskTestRow::as_select())
                .load::<TaskTestRow>(connection)
                .map_err(GradingStoreError::persistence)?;
            rows.into_iter().map(row_to_task_test).collect()
        })
        .await
    }

    async fn find_language(&self, spec: &LanguageSpec) -> GradingStoreResult<Option<Language>> {
        let key = spec.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = languages::table
                .filter(languages::spec.eq(key))
                .select(LanguageRow::as_select())
                .first::<LanguageRow>(connection)
                .optional()
                .map_err(GradingStoreError::persistence)?;
            row.map(row_to_language).transpose()
        })
        .await
    }
}

#[async_trait]
impl StandingsRepository for PostgresGradingStore {
    async fn find_user_task_result(
        &self,
        user: &UserLogin,
        task: &TaskSpec,
    ) -> GradingStoreResult<Option<UserTaskResult>> {
        let user_key = user.as_str().to_owned();
        let task_key = task.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = user_task_results::table
                .filter(user_task_results::user_login.eq(user_key))
                .filter(user_task_results::task.eq(task_key))
                .select(UserTaskResultRow::as_select())
                .first::<UserTaskResultRow>(connection)
                .optional()
                .map_err(GradingStoreError::persistence)?;
            row.map(row_to_user_task_result).transpose()
        })
        .await
    }

    async fn insert_user_task_result(&self, result: &UserTaskResult) -> GradingStoreResult<()> {
        let new_row = NewUserTaskResultRow {
            user_login: result.user.as_str().to_owned(),
            task: result.task.as_str().to_owned(),
            results: to_json(&result.results)?,
            bests: to_json(&result.bests)?,
        };
        self.run_blocking(move |connection| {
            diesel::insert_into(user_task_results::table)
                .values(&new_row)
                .execute(connection)
                .map_err(GradingStoreError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn append_user_task_result(
        &self,
        user: &UserLogin,
        task: &TaskSpec,
        current: &AttemptSnapshot,
        best: &AttemptSnapshot,
    ) -> GradingStoreResult<()> {
        let user_key = user.as_str().to_owned();
        let task_key = task.as_str().to_owned();
        let current_entry = to_json(&[current])?;
        let best_entry = to_json(&[best])?;
        self.run_blocking(move |connection| {
            diesel::sql_query(concat!(
                "UPDATE user_task_results ",
                "SET results = results || $3, bests = bests || $4 ",
                "WHERE user_login = $1 AND task = $2",
            ))
            .bind::<diesel::sql_types::Text, _>(user_key)
            .bind::<diesel::sql_types::Text, _>(task_key)
            .bind::<diesel::sql_types::Jsonb, _>(current_entry)
            .bind::<diesel::sql_types::Jsonb, _>(best_entry)
            .execute(connection)
            .map_err(GradingStoreError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn increment_rating(&self, user: &UserLogin) -> GradingStoreResult<()> {
        let new_row = NewRatingRow {
            user_login: user.as_str().to_owned(),
            score: 1,
        };
        self.run_blocking(move |connection| {
            diesel::insert_into(ratings::table)
                .values(&new_row)
                .on_conflict(ratings::user_login)
                .do_update()
                .set(ratings::score.eq(ratings::score + 1_i64))
                .execute(connection)
                .map_err(GradingStoreError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn find_rating(&self, user: &UserLogin) -> GradingStoreResult<Option<u64>> {
        let key = user.as_str().to_owned();
        self.run_blocking(move |connection| {
            let score = ratings::table
                .filter(ratings::user_login.eq(key))
                .select(ratings::score)
                .first::<i64>(connection)
                .optional()
                .map_err(GradingStoreError::persistence)?;
            score
                .map(|value| {
                    u64::try_from(value).map_err(GradingStoreError::invalid_persisted_data)
                })
                .transpose()
        })
        .await
    }
}

fn to_json(value: &impl Serialize) -> GradingStoreResult<Value> {
    serde_json::to_value(value).map_err(GradingStoreError::persistence)
}

fn from_json<T: DeserializeOwned>(value: Value) -> GradingStoreResult<T> {
    serde_json::from_value(value).map_err(GradingStoreError::invalid_persisted_data)
}

fn to_u32(value: i32) -> GradingStoreResult<u32> {
    u32::try_from(value).map_err(GradingStoreError::invalid_persisted_data)
}

fn row_to_attempt(row: AttemptRow) -> GradingStoreResult<Attempt> {
    let AttemptRow {
        spec,
        author,
        language,
        constraints,
        status: persisted_status,
        date,
        results,
        text_answers,
        program,
        verdict,
        verdict_test,
        logs,
    } = row;

    let outcome = match (verdict, verdict_test) {
        (Some(code), Some(index)) => Some(FinalVerdict {
            verdict: Verdict::try_from(code).map_err(GradingStoreError::invalid_persisted_data)?,
            verdict_test: to_u32(index)?,
        }),
        _ => None,
    };

    let data = PersistedAttemptData {
        spec: AttemptSpec::new(spec).map_err(GradingStoreError::invalid_persisted_data)?,
        author: UserLogin::new(author).map_err(GradingStoreError::invalid_persisted_data)?,
        language: LanguageSpec::new(language).map_err(GradingStoreError::invalid_persisted_data)?,
        constraints: from_json(constraints)?,
        status: AttemptStatus::try_from(persisted_status.as_str())
            .map_err(GradingStoreError::invalid_persisted_data)?,
        date,
        results: from_json(results)?,
        text_answers: from_json(text_answers)?,
        program,
        outcome,
        logs: from_json(logs)?,
    };
    Ok(Attempt::from_persisted(data))
}

fn row_to_grading_job(row: GradingJobRow) -> GradingStoreResult<GradingJob> {
    let checker = row
        .checker
        .map(from_json::<CheckerProgram>)
        .transpose()?;
    Ok(GradingJob {
        attempt: AttemptSpec::new(row.attempt).map_err(GradingStoreError::invalid_persisted_data)?,
        task_type: row.task_type,
        task_check_type: row.task_check_type,
        checker,
    })
}

fn row_to_task_layout(row: TaskLayoutRow) -> GradingStoreResult<TaskLayout> {
    Ok(TaskLayout {
        spec: TaskSpec::new(row.spec).map_err(GradingStoreError::invalid_persisted_data)?,
        tests: from_json(row.tests)?,
        test_groups: from_json(row.test_groups)?,
    })
}

fn row_to_task_test(row: TaskTestRow) -> GradingStoreResult<TaskTest> {
    let spec = TestSpec::new(row.spec).map_err(GradingStoreError::invalid_persisted_data)?;
    Ok(TaskTest::new(spec, row.input_data, row.output_data))
}

fn row_to_language(row: LanguageRow) -> GradingStoreResult<Language> {
    Ok(Language::new(
        LanguageSpec::new(row.spec).map_err(GradingStoreError::invalid_persisted_data)?,
        to_u32(row.compile_offset_ms)?,
        to_u32(row.run_offset_ms)?,
        to_u32(row.memory_offset_mb)?,
    ))
}

fn row_to_user_task_result(row: UserTaskResultRow) -> GradingStoreResult<UserTaskResult> {
    Ok(UserTaskResult {
        task: TaskSpec::new(row.task).map_err(GradingStoreError::invalid_persisted_data)?,
        user: UserLogin::new(row.user_login).map_err(GradingStoreError::invalid_persisted_data)?,
        results: from_json(row.results)?,
        bests: from_json(row.bests)?,
    })
}
