//! Scripted grading strategy for tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::grading::{
    domain::Verdict,
    ports::{CheckJob, CheckReport, Checker, CheckerError, CheckerResult},
};

/// Behaviour of a [`ScriptedChecker`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedOutcome {
    /// Returns this report unchanged.
    Report(CheckReport),
    /// Returns one copy of the verdict per graded test.
    Uniform(Verdict),
    /// Fails with a runtime error carrying the message.
    Fail(String),
    /// Panics with the message.
    Panic(String),
}

/// Checker that replays a fixed outcome and records every job it receives.
#[derive(Debug, Clone)]
pub struct ScriptedChecker {
    outcome: ScriptedOutcome,
    jobs: Arc<Mutex<Vec<CheckJob>>>,
}

impl ScriptedChecker {
    /// Creates a checker replaying `outcome`.
    #[must_use]
    pub fn new(outcome: ScriptedOutcome) -> Self {
        Self {
            outcome,
            jobs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Creates a checker grading every test with `verdict`.
    #[must_use]
    pub fn uniform(verdict: Verdict) -> Self {
        Self::new(ScriptedOutcome::Uniform(verdict))
    }

    /// Creates a checker returning `verdicts` in order.
    #[must_use]
    pub fn reporting(verdicts: Vec<Verdict>) -> Self {
        Self::new(ScriptedOutcome::Report(CheckReport::new(verdicts, Vec::new())))
    }

    /// Creates a checker failing with `message`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(ScriptedOutcome::Fail(message.into()))
    }

    /// Returns the jobs received so far.
    #[must_use]
    pub fn jobs(&self) -> Vec<CheckJob> {
        self.jobs
            .lock()
            .map(|jobs| jobs.clone())
            .unwrap_or_default()
    }

    /// Returns the number of calls received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.jobs.lock().map(|jobs| jobs.len()).unwrap_or_default()
    }
}

#[async_trait]
impl Checker for ScriptedChecker {
    async fn check(&self, job: &CheckJob) -> CheckerResult<CheckReport> {
        if let Ok(mut jobs) = self.jobs.lock() {
            jobs.push(job.clone());
        }
        match &self.outcome {
            ScriptedOutcome::Report(report) => Ok(report.clone()),
            ScriptedOutcome::Uniform(verdict) => Ok(CheckReport::new(
                verdict.uniform(job.test_count()),
                vec![format!("{} graded {verdict}", job.route())],
            )),
            ScriptedOutcome::Fail(message) => Err(CheckerError::runtime(std::io::Error::other(
                message.clone(),
            ))),
            ScriptedOutcome::Panic(message) => panic!("{message}"),
        }
    }
}
