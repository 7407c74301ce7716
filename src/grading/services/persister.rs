//! Recording of a grading outcome across attempt, standings and job records.

use crate::grading::{
    domain::{
        Attempt, AttemptSnapshot, AttemptStatus, FinalVerdict, FinishedAttempt,
        GradingDomainError, StandingsPlan, StandingsWrite, TaskSpec, UserLogin, Verdict,
    },
    ports::{GradingStore, GradingStoreError, GradingStoreResult},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while recording a grading outcome.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The verdicts do not fit the attempt.
    #[error(transparent)]
    Domain(#[from] GradingDomainError),
    /// A storage write failed.
    #[error(transparent)]
    Store(#[from] GradingStoreError),
}

/// Writes the terminal state of a graded attempt.
pub struct ResultPersister<S>
where
    S: GradingStore,
{
    store: Arc<S>,
}

impl<S> ResultPersister<S>
where
    S: GradingStore,
{
    /// Creates a persister.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Aggregates `verdicts` into `attempt` and records the outcome.
    ///
    /// Four independent writes are issued together: the grading job is
    /// deleted, the attempt is finished, the user's standings are updated
    /// and the status mirror is set to finished. Every write runs to
    /// completion even when another fails, so a failure may leave the
    /// records partially updated. Verdicts are aggregated on a copy and
    /// `attempt` is replaced with the terminal state only when all writes
    /// succeed; on any error it is left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Domain`] before any write when the verdict
    /// count differs from the attempt's result slots, or the first
    /// [`PersistError::Store`] failure among the writes.
    pub async fn save(
        &self,
        attempt: &mut Attempt,
        author: &UserLogin,
        task: &TaskSpec,
        verdicts: &[Verdict],
        logs: Vec<String>,
    ) -> Result<FinalVerdict, PersistError> {
        let mut graded = attempt.clone();
        let outcome = graded.apply_verdicts(verdicts)?;
        let finished = FinishedAttempt::new(&graded, outcome, logs);
        let snapshot = AttemptSnapshot::from_verdicts(
            graded.spec().clone(),
            graded.date(),
            verdicts,
            outcome,
        );
        let spec = graded.spec();

        let (deleted, stored, ranked, mirrored) = tokio::join!(
            self.store.delete_grading_job(spec),
            self.store.finish_attempt(spec, &finished),
            self.record_standings(author, task, snapshot),
            self.store.set_status_mirror(spec, AttemptStatus::Finished),
        );
        let writes = [
            ("delete grading job", deleted),
            ("finish attempt", stored),
            ("record standings", ranked),
            ("mirror status", mirrored.map(|_| ())),
        ];
        let mut first_error = None;
        for (write, result) in writes {
            if let Err(err) = result {
                warn!(attempt = %spec, write, error = %err, "result write failed");
                first_error.get_or_insert(err);
            }
        }
        if let Some(err) = first_error {
            return Err(err.into());
        }

        graded.finish(&finished);
        *attempt = graded;
        info!(
            attempt = %attempt.spec(),
            verdict = %outcome.verdict,
            verdict_test = outcome.verdict_test,
            "recorded grading outcome"
        );
        Ok(outcome)
    }

    async fn record_standings(
        &self,
        author: &UserLogin,
        task: &TaskSpec,
        current: AttemptSnapshot,
    ) -> GradingStoreResult<()> {
        let existing = self.store.find_user_task_result(author, task).await?;
        let plan = StandingsPlan::decide(author, task, existing.as_ref(), current);
        debug!(
            user = %author,
            task = %task,
            best = %plan.best.attempt,
            increment_rating = plan.increment_rating,
            "merged best attempt"
        );

        let write = async {
            match &plan.write {
                StandingsWrite::Create(result) => self.store.insert_user_task_result(result).await,
                StandingsWrite::Append => {
                    self.store
                        .append_user_task_result(author, task, &plan.current, &plan.best)
                        .await
                }
            }
        };
        let rating = async {
            if plan.increment_rating {
                self.store.increment_rating(author).await
            } else {
                Ok(())
            }
        };
        let (written, rated) = tokio::join!(write, rating);
        written.and(rated)
    }
}
