//! Per-user task history, best-attempt merge and rating eligibility.

use super::{AttemptSpec, FinalVerdict, TaskSpec, UserLogin, Verdict};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Share of passed tests as a whole percentage, truncated toward zero.
///
/// An attempt without tests scores `0`.
///
/// # Examples
///
/// ```
/// use arbiter::grading::domain::percent_tests;
///
/// assert_eq!(percent_tests(3, 7), 42);
/// assert_eq!(percent_tests(3, 4), 75);
/// assert_eq!(percent_tests(0, 0), 0);
/// ```
#[must_use]
pub fn percent_tests(passed: u32, total: u32) -> u8 {
    let scaled = u64::from(passed).saturating_mul(100);
    scaled
        .checked_div(u64::from(total))
        .map_or(0, |percent| u8::try_from(percent.min(100)).unwrap_or(100))
}

/// Snapshot of one graded attempt as recorded in the user's task history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSnapshot {
    /// Attempt identifier.
    pub attempt: AttemptSpec,
    /// Date attached to the snapshot.
    pub date: DateTime<Utc>,
    /// Number of tests with an OK verdict.
    pub passed_tests: u32,
    /// Truncated share of passed tests.
    pub percent_tests: u8,
    /// Final verdict.
    pub verdict: Verdict,
    /// One-based index of the final verdict test.
    pub verdict_test: u32,
}

impl AttemptSnapshot {
    /// Summarises a graded attempt.
    #[must_use]
    pub fn from_verdicts(
        attempt: AttemptSpec,
        date: DateTime<Utc>,
        verdicts: &[Verdict],
        outcome: FinalVerdict,
    ) -> Self {
        let passed = verdicts.iter().filter(|verdict| verdict.is_ok()).count();
        let passed_tests = u32::try_from(passed).unwrap_or(u32::MAX);
        let total = u32::try_from(verdicts.len()).unwrap_or(u32::MAX);
        Self {
            attempt,
            date,
            passed_tests,
            percent_tests: percent_tests(passed_tests, total),
            verdict: outcome.verdict,
            verdict_test: outcome.verdict_test,
        }
    }

    /// Returns `true` when the snapshot records a fully correct attempt.
    #[must_use]
    pub const fn is_fully_correct(&self) -> bool {
        self.verdict.is_ok()
    }

    /// Returns `true` when this snapshot stays the best over `current`.
    ///
    /// A solved task stays solved, and a strictly higher percentage wins.
    #[must_use]
    pub const fn outranks(&self, current: &Self) -> bool {
        (self.is_fully_correct() && current.is_fully_correct())
            || self.percent_tests > current.percent_tests
    }

    /// Returns a copy dated `date`.
    #[must_use]
    pub fn carried_to(&self, date: DateTime<Utc>) -> Self {
        Self {
            date,
            ..self.clone()
        }
    }
}

/// Aggregate of every graded attempt a user made on one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTaskResult {
    /// Task identifier.
    pub task: TaskSpec,
    /// User login.
    pub user: UserLogin,
    /// Append-only history, one entry per graded attempt.
    pub results: Vec<AttemptSnapshot>,
    /// Append-only history of the best attempt known after each grading.
    pub bests: Vec<AttemptSnapshot>,
}

impl UserTaskResult {
    /// Creates the aggregate for a first graded attempt.
    #[must_use]
    pub fn first(
        user: UserLogin,
        task: TaskSpec,
        current: AttemptSnapshot,
        best: AttemptSnapshot,
    ) -> Self {
        Self {
            task,
            user,
            results: vec![current],
            bests: vec![best],
        }
    }

    /// Returns the most recent best-attempt entry.
    #[must_use]
    pub fn latest_best(&self) -> Option<&AttemptSnapshot> {
        self.bests.last()
    }

    /// Appends one grading to both histories.
    pub fn push(&mut self, current: AttemptSnapshot, best: AttemptSnapshot) {
        self.results.push(current);
        self.bests.push(best);
    }
}

/// Storage write required to record a grading in the user's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StandingsWrite {
    /// No aggregate exists yet; insert this one.
    Create(UserTaskResult),
    /// Append `current` to `results` and `best` to `bests`.
    Append,
}

/// Decision taken for one graded attempt against the user's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandingsPlan {
    /// Snapshot of the attempt just graded.
    pub current: AttemptSnapshot,
    /// Best attempt after this grading.
    pub best: AttemptSnapshot,
    /// Storage write to perform.
    pub write: StandingsWrite,
    /// Whether the user's rating gains one point.
    pub increment_rating: bool,
}

impl StandingsPlan {
    /// Merges `current` into the existing aggregate, if any.
    ///
    /// The previous best is carried forward with the current date when it
    /// outranks `current`; otherwise `current` becomes the best. The rating
    /// grows only for the first fully correct best on this task.
    #[must_use]
    pub fn decide(
        user: &UserLogin,
        task: &TaskSpec,
        existing: Option<&UserTaskResult>,
        current: AttemptSnapshot,
    ) -> Self {
        let previous = existing.and_then(UserTaskResult::latest_best);
        let best = match previous {
            Some(previous_best) if previous_best.outranks(&current) => {
                previous_best.carried_to(current.date)
            }
            _ => current.clone(),
        };
        let already_solved = previous.is_some_and(AttemptSnapshot::is_fully_correct);
        let increment_rating = best.is_fully_correct() && !already_solved;
        let write = match existing {
            Some(_) => StandingsWrite::Append,
            None => StandingsWrite::Create(UserTaskResult::first(
                user.clone(),
                task.clone(),
                current.clone(),
                best.clone(),
            )),
        };

        Self {
            current,
            best,
            write,
            increment_rating,
        }
    }
}
