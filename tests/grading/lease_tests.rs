//! Exclusive claims under concurrent grading passes.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::helpers::{day, manager, seed_attempt, seed_task, stored_attempt, workspace_root};
use arbiter::grading::{
    adapters::memory::{InMemoryGradingStore, RecordingAlertSink},
    domain::{AttemptStatus, CheckType, FinalVerdict, TaskType, Verdict},
    ports::{CheckJob, CheckReport, Checker, CheckerResult, StandingsRepository},
    services::{GradingOutcome, LEASE_LOST_LOG, LeaseManager},
};
use async_trait::async_trait;
use rstest::rstest;
use tokio::sync::Notify;

/// Checker that parks inside `check` until released.
#[derive(Default)]
struct GatedChecker {
    entered: Notify,
    release: Notify,
    calls: AtomicUsize,
}

#[async_trait]
impl Checker for GatedChecker {
    async fn check(&self, job: &CheckJob) -> CheckerResult<CheckReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        Ok(CheckReport::new(
            Verdict::Ok.uniform(job.test_count()),
            Vec::new(),
        ))
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn only_one_concurrent_claim_succeeds() {
    let store = Arc::new(InMemoryGradingStore::new());
    let task = seed_task(&store, "race", 1).expect("seed task");
    let submission = seed_attempt(
        &store,
        "attempt-1",
        "dave",
        &task,
        (TaskType::Text, CheckType::TestsChecker),
        day(1).expect("date"),
    )
    .expect("seed attempt");
    let lease = Arc::new(LeaseManager::new(Arc::clone(&store)));

    let claims: Vec<_> = (0..8)
        .map(|_| {
            let contender = Arc::clone(&lease);
            let attempt = submission.attempt.clone();
            tokio::spawn(async move { contender.try_claim(&attempt).await })
        })
        .collect();
    let mut winners = 0;
    for claim in claims {
        if claim.await.expect("join claim").expect("claim runs") {
            winners += 1;
        }
    }

    assert_eq!(winners, 1);
    let stored = stored_attempt(&store, &submission.attempt)
        .await
        .expect("read attempt");
    assert_eq!(stored.status(), AttemptStatus::Testing);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_pass_records_not_tested_while_first_is_grading() {
    let store = Arc::new(InMemoryGradingStore::new());
    let task = seed_task(&store, "race", 2).expect("seed task");
    let submission = seed_attempt(
        &store,
        "attempt-1",
        "erin",
        &task,
        (TaskType::Text, CheckType::TestsChecker),
        day(1).expect("date"),
    )
    .expect("seed attempt");
    let checker = Arc::new(GatedChecker::default());
    let alerts = RecordingAlertSink::new();
    let (_dir, root) = workspace_root().expect("workspace root");
    let manager = manager(&store, Arc::clone(&checker) as _, &alerts, root);

    let first = manager.start(&submission.attempt, &submission.author, &submission.task);
    let second = async {
        checker.entered.notified().await;
        let outcome = manager
            .start(&submission.attempt, &submission.author, &submission.task)
            .await;
        let snapshot = stored_attempt(&store, &submission.attempt).await;
        checker.release.notify_one();
        (outcome, snapshot)
    };
    let (first_outcome, (second_outcome, while_grading)) = tokio::join!(first, second);

    assert_eq!(
        first_outcome.expect("first pass runs"),
        GradingOutcome::Graded(FinalVerdict {
            verdict: Verdict::Ok,
            verdict_test: 2,
        })
    );
    assert_eq!(
        second_outcome.expect("second pass runs"),
        GradingOutcome::LeaseLost
    );
    assert_eq!(checker.calls.load(Ordering::SeqCst), 1);
    let interim = while_grading.expect("read attempt");
    assert_eq!(interim.logs(), [LEASE_LOST_LOG.to_owned()]);
    assert_eq!(
        interim.outcome().map(|outcome| outcome.verdict),
        Some(Verdict::NotTested)
    );
    let stored = stored_attempt(&store, &submission.attempt)
        .await
        .expect("read attempt");
    assert_eq!(
        stored.outcome(),
        Some(FinalVerdict {
            verdict: Verdict::Ok,
            verdict_test: 2,
        })
    );
    let standings = store
        .find_user_task_result(&submission.author, &submission.task)
        .await
        .expect("read standings")
        .expect("standings exist");
    assert_eq!(standings.results.len(), 2);
    assert_eq!(
        store
            .find_rating(&submission.author)
            .await
            .expect("read rating"),
        Some(1)
    );
}
