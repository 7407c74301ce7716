//! Attempt aggregate and verdict aggregation.

use super::{
    AttemptSpec, AttemptStatus, GradingDomainError, LanguageSpec, TestSpec, UserLogin, Verdict,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Resource constraints declared for an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    /// Run time limit per test in milliseconds.
    pub time_ms: Option<u32>,
    /// Memory limit in megabytes.
    pub memory_mb: Option<u32>,
}

/// One result slot of an attempt.
///
/// Slot order parallels the attempt's referenced tests and is never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptResult {
    /// Test graded in this slot.
    pub test: TestSpec,
    /// Verdict, unset until aggregation.
    #[serde(default)]
    pub verdict: Option<Verdict>,
}

impl AttemptResult {
    /// Creates an ungraded result slot.
    #[must_use]
    pub const fn pending(test: TestSpec) -> Self {
        Self {
            test,
            verdict: None,
        }
    }
}

/// Submitted attempt under grading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    spec: AttemptSpec,
    author: UserLogin,
    language: LanguageSpec,
    #[serde(default)]
    constraints: Constraints,
    status: AttemptStatus,
    date: DateTime<Utc>,
    #[serde(default)]
    results: Vec<AttemptResult>,
    #[serde(default)]
    text_answers: Vec<String>,
    #[serde(default)]
    program: Option<String>,
    #[serde(default)]
    outcome: Option<FinalVerdict>,
    #[serde(default)]
    logs: Vec<String>,
}

/// Parameter object for reconstructing a persisted attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAttemptData {
    /// Attempt identifier.
    pub spec: AttemptSpec,
    /// Author login.
    pub author: UserLogin,
    /// Program language.
    pub language: LanguageSpec,
    /// Declared constraints.
    pub constraints: Constraints,
    /// Lifecycle status.
    pub status: AttemptStatus,
    /// Submission date.
    pub date: DateTime<Utc>,
    /// Result slots.
    pub results: Vec<AttemptResult>,
    /// Free-text answers.
    pub text_answers: Vec<String>,
    /// Submitted program source.
    pub program: Option<String>,
    /// Final verdict, once finished.
    pub outcome: Option<FinalVerdict>,
    /// Stored log bundle.
    pub logs: Vec<String>,
}

impl Attempt {
    /// Reconstructs an attempt from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAttemptData) -> Self {
        Self {
            spec: data.spec,
            author: data.author,
            language: data.language,
            constraints: data.constraints,
            status: data.status,
            date: data.date,
            results: data.results,
            text_answers: data.text_answers,
            program: data.program,
            outcome: data.outcome,
            logs: data.logs,
        }
    }

    /// Creates a pending attempt with no result slots.
    #[must_use]
    pub const fn new(
        spec: AttemptSpec,
        author: UserLogin,
        language: LanguageSpec,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            spec,
            author,
            language,
            constraints: Constraints {
                time_ms: None,
                memory_mb: None,
            },
            status: AttemptStatus::Pending,
            date,
            results: Vec::new(),
            text_answers: Vec::new(),
            program: None,
            outcome: None,
            logs: Vec::new(),
        }
    }

    /// Sets resource constraints.
    #[must_use]
    pub const fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Adds one ungraded result slot per test, in order.
    #[must_use]
    pub fn with_tests(mut self, tests: impl IntoIterator<Item = TestSpec>) -> Self {
        self.results = tests.into_iter().map(AttemptResult::pending).collect();
        self
    }

    /// Sets free-text answers for text tasks.
    #[must_use]
    pub fn with_text_answers(mut self, answers: impl IntoIterator<Item = String>) -> Self {
        self.text_answers = answers.into_iter().collect();
        self
    }

    /// Sets the submitted program source.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    /// Sets the lifecycle status, as read back from storage.
    #[must_use]
    pub const fn with_status(mut self, status: AttemptStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns the attempt identifier.
    #[must_use]
    pub const fn spec(&self) -> &AttemptSpec {
        &self.spec
    }

    /// Returns the program language.
    #[must_use]
    pub const fn language(&self) -> &LanguageSpec {
        &self.language
    }

    /// Returns the declared constraints.
    #[must_use]
    pub const fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> AttemptStatus {
        self.status
    }

    /// Returns the submission date.
    #[must_use]
    pub const fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Returns the result slots.
    #[must_use]
    pub fn results(&self) -> &[AttemptResult] {
        &self.results
    }

    /// Returns the free-text answers.
    #[must_use]
    pub fn text_answers(&self) -> &[String] {
        &self.text_answers
    }

    /// Returns the submitted program source, if any.
    #[must_use]
    pub fn program(&self) -> Option<&str> {
        self.program.as_deref()
    }

    /// Returns the final verdict once the attempt is finished.
    #[must_use]
    pub const fn outcome(&self) -> Option<FinalVerdict> {
        self.outcome
    }

    /// Returns the stored log bundle.
    #[must_use]
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    /// Returns the tests referenced by the result slots, in slot order.
    #[must_use]
    pub fn test_specs(&self) -> Vec<TestSpec> {
        self.results.iter().map(|result| result.test.clone()).collect()
    }

    /// Moves the status forward.
    ///
    /// # Errors
    ///
    /// Returns [`GradingDomainError::InvalidStatusTransition`] when the move
    /// would regress the status.
    pub fn advance_status(&mut self, target: AttemptStatus) -> Result<(), GradingDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(GradingDomainError::InvalidStatusTransition {
                from: self.status.as_str(),
                to: target.as_str(),
            });
        }
        self.status = target;
        Ok(())
    }

    /// Assigns `verdicts` to the result slots and aggregates them.
    ///
    /// # Errors
    ///
    /// Returns [`GradingDomainError::VerdictCountMismatch`] when the verdict
    /// count differs from the number of result slots.
    pub fn apply_verdicts(
        &mut self,
        verdicts: &[Verdict],
    ) -> Result<FinalVerdict, GradingDomainError> {
        FinalVerdict::aggregate(&mut self.results, verdicts)
    }

    /// Replaces the stored state with a terminal grading result.
    pub fn finish(&mut self, finished: &FinishedAttempt) {
        self.status = AttemptStatus::Finished;
        self.results.clone_from(&finished.results);
        self.outcome = Some(FinalVerdict {
            verdict: finished.verdict,
            verdict_test: finished.verdict_test,
        });
        self.logs.clone_from(&finished.logs);
    }
}

/// Attempt-level verdict derived from per-test verdicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalVerdict {
    /// Verdict of the test where the scan stopped.
    pub verdict: Verdict,
    /// One-based index of that test; `0` when nothing was graded.
    pub verdict_test: u32,
}

impl FinalVerdict {
    /// Result for an attempt without any graded test.
    pub const NOT_TESTED: Self = Self {
        verdict: Verdict::NotTested,
        verdict_test: 0,
    };

    /// Writes `verdicts[i]` into `results[i]` and scans for the first failure.
    ///
    /// The scan stops at the first non-OK verdict and reports it with its
    /// one-based position. When every verdict is OK the last test is
    /// reported, so the index equals the test count.
    ///
    /// # Errors
    ///
    /// Returns [`GradingDomainError::VerdictCountMismatch`] when the two
    /// sequences differ in length; `results` is left untouched in that case.
    pub fn aggregate(
        results: &mut [AttemptResult],
        verdicts: &[Verdict],
    ) -> Result<Self, GradingDomainError> {
        if results.len() != verdicts.len() {
            return Err(GradingDomainError::VerdictCountMismatch {
                expected: results.len(),
                actual: verdicts.len(),
            });
        }

        for (result, verdict) in results.iter_mut().zip(verdicts) {
            result.verdict = Some(*verdict);
        }

        let mut outcome = Self::NOT_TESTED;
        for verdict in verdicts {
            outcome.verdict_test = outcome.verdict_test.saturating_add(1);
            outcome.verdict = *verdict;
            if !verdict.is_ok() {
                break;
            }
        }
        Ok(outcome)
    }

    /// Returns `true` when every test passed.
    #[must_use]
    pub const fn is_fully_correct(self) -> bool {
        self.verdict.is_ok()
    }
}

/// Terminal state written to an attempt record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedAttempt {
    /// Final verdict.
    pub verdict: Verdict,
    /// One-based index of the final verdict test.
    pub verdict_test: u32,
    /// Graded result slots.
    pub results: Vec<AttemptResult>,
    /// Strategy log bundle.
    pub logs: Vec<String>,
}

impl FinishedAttempt {
    /// Builds the terminal record from an aggregated attempt.
    #[must_use]
    pub fn new(attempt: &Attempt, outcome: FinalVerdict, logs: Vec<String>) -> Self {
        Self {
            verdict: outcome.verdict,
            verdict_test: outcome.verdict_test,
            results: attempt.results().to_vec(),
            logs,
        }
    }
}
