//! Containment of grading failures.

use super::{GradingOutcome, HandlerError, ResultPersister};
use crate::grading::{
    domain::{Attempt, TaskSpec, UserLogin, Verdict},
    ports::{Alert, AlertKind, AlertSink, GradingStore},
};
use futures::FutureExt;
use mockable::Clock;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::error;

/// Runs grading handlers so that every failure ends in a recorded outcome.
///
/// A handler error or panic raises a grading-failure alert and finishes the
/// attempt with a system-error verdict on every result slot, using the
/// failure description as the only log line. When that save fails too, a
/// second save-failure alert is raised and the attempt stays unfinished.
/// Failures never propagate to the caller.
pub struct FailureSupervisor<S, L, K>
where
    S: GradingStore,
    L: AlertSink,
    K: Clock + Send + Sync,
{
    persister: Arc<ResultPersister<S>>,
    alerts: Arc<L>,
    clock: Arc<K>,
}

impl<S, L, K> FailureSupervisor<S, L, K>
where
    S: GradingStore,
    L: AlertSink,
    K: Clock + Send + Sync,
{
    /// Creates a supervisor.
    #[must_use]
    pub const fn new(persister: Arc<ResultPersister<S>>, alerts: Arc<L>, clock: Arc<K>) -> Self {
        Self {
            persister,
            alerts,
            clock,
        }
    }

    /// Awaits `handler`, containing any failure.
    ///
    /// `attempt` is the attempt as loaded, before the handler touched it.
    pub async fn supervise<F>(
        &self,
        attempt: &Attempt,
        author: &UserLogin,
        task: &TaskSpec,
        handler: F,
    ) -> GradingOutcome
    where
        F: Future<Output = Result<GradingOutcome, HandlerError>>,
    {
        let cause = match AssertUnwindSafe(handler).catch_unwind().await {
            Ok(Ok(outcome)) => return outcome,
            Ok(Err(err)) => err.to_string(),
            Err(payload) => panic_message(payload.as_ref()),
        };
        error!(attempt = %attempt.spec(), cause = %cause, "grading failed");
        self.raise(AlertKind::GradingFailure, attempt, &cause).await;

        let mut fallback = attempt.clone();
        let verdicts = Verdict::SystemError.uniform(fallback.results().len());
        match self
            .persister
            .save(&mut fallback, author, task, &verdicts, vec![cause.clone()])
            .await
        {
            Ok(_) => GradingOutcome::SystemError { cause },
            Err(err) => {
                let save_error = err.to_string();
                error!(
                    attempt = %attempt.spec(),
                    error = %save_error,
                    "failed to record system error"
                );
                self.raise(AlertKind::SaveFailure, attempt, &save_error).await;
                GradingOutcome::Unsaved { cause, save_error }
            }
        }
    }

    async fn raise(&self, kind: AlertKind, attempt: &Attempt, message: &str) {
        let alert = Alert::new(kind, attempt.spec().clone(), message, self.clock.utc());
        self.alerts.send_alert(&alert).await;
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "grading handler panicked".to_owned())
}
