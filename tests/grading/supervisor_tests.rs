//! Failure containment of grading passes.

use std::sync::Arc;

use super::helpers::{
    Submission, day, manager, seed_attempt, seed_task, stored_attempt, workspace_root,
};
use arbiter::grading::{
    adapters::memory::{
        InMemoryGradingStore, RecordingAlertSink, ScriptedChecker, ScriptedOutcome, StoreWrite,
    },
    domain::{AttemptStatus, CheckType, FinalVerdict, TaskType, Verdict},
    ports::{AlertKind, AttemptRepository},
    services::GradingOutcome,
};
use rstest::{fixture, rstest};

struct Failing {
    store: Arc<InMemoryGradingStore>,
    submission: Submission,
}

#[fixture]
fn failing() -> Failing {
    let store = Arc::new(InMemoryGradingStore::new());
    let task = seed_task(&store, "matrix", 3).expect("seed task");
    let submission = seed_attempt(
        &store,
        "attempt-7",
        "frank",
        &task,
        (TaskType::Code, CheckType::TestsChecker),
        day(4).expect("date"),
    )
    .expect("seed attempt");
    Failing { store, submission }
}

async fn grade(
    fixture: &Failing,
    checker: ScriptedChecker,
    alerts: &RecordingAlertSink,
) -> GradingOutcome {
    let (_dir, root) = workspace_root().expect("workspace root");
    manager(&fixture.store, Arc::new(checker), alerts, root)
        .start(
            &fixture.submission.attempt,
            &fixture.submission.author,
            &fixture.submission.task,
        )
        .await
        .expect("pass runs")
}

#[rstest]
#[case::checker_error(ScriptedChecker::failing("sandbox offline"), "sandbox offline")]
#[case::checker_panic(
    ScriptedChecker::new(ScriptedOutcome::Panic("compiler crashed".to_owned())),
    "compiler crashed"
)]
#[tokio::test(flavor = "multi_thread")]
async fn failure_finishes_attempt_with_system_error(
    failing: Failing,
    #[case] checker: ScriptedChecker,
    #[case] cause: &str,
) {
    let alerts = RecordingAlertSink::new();

    let outcome = grade(&failing, checker, &alerts).await;

    assert!(matches!(
        outcome,
        GradingOutcome::SystemError { cause: ref recorded } if recorded.contains(cause)
    ));
    let raised = alerts.alerts();
    assert_eq!(raised.len(), 1);
    let alert = raised.first().expect("one alert");
    assert_eq!(alert.kind, AlertKind::GradingFailure);
    assert_eq!(alert.kind.title(), "ManagerError");
    assert!(alert.body().starts_with("attempt-7\n"));
    assert!(alert.message.contains(cause));

    let stored = stored_attempt(&failing.store, &failing.submission.attempt)
        .await
        .expect("read attempt");
    assert_eq!(stored.status(), AttemptStatus::Finished);
    assert_eq!(
        stored.outcome(),
        Some(FinalVerdict {
            verdict: Verdict::SystemError,
            verdict_test: 1,
        })
    );
    assert_eq!(stored.logs().len(), 1);
    assert!(
        failing
            .store
            .find_grading_job(&failing.submission.attempt)
            .await
            .expect("read job")
            .is_none()
    );
    assert_eq!(
        failing
            .store
            .status_mirror(&failing.submission.attempt)
            .expect("read mirror"),
        Some(AttemptStatus::Finished)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_system_error_save_raises_second_alert(failing: Failing) {
    failing
        .store
        .fail_writes(StoreWrite::FinishAttempt)
        .expect("inject failure");
    let alerts = RecordingAlertSink::new();

    let outcome = grade(&failing, ScriptedChecker::failing("sandbox offline"), &alerts).await;

    assert!(matches!(outcome, GradingOutcome::Unsaved { .. }));
    let kinds: Vec<AlertKind> = alerts.alerts().iter().map(|alert| alert.kind).collect();
    assert_eq!(kinds, vec![AlertKind::GradingFailure, AlertKind::SaveFailure]);
    assert_eq!(
        AlertKind::SaveFailure.title(),
        "ManagerError (when saving results)"
    );
    let stored = stored_attempt(&failing.store, &failing.submission.attempt)
        .await
        .expect("read attempt");
    assert_eq!(stored.status(), AttemptStatus::Testing);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_claim_is_contained(failing: Failing) {
    failing
        .store
        .fail_writes(StoreWrite::TransitionStatus)
        .expect("inject failure");
    let alerts = RecordingAlertSink::new();
    let checker = ScriptedChecker::uniform(Verdict::Ok);
    let probe = checker.clone();

    let outcome = grade(&failing, checker, &alerts).await;

    assert!(matches!(outcome, GradingOutcome::SystemError { .. }));
    assert_eq!(probe.call_count(), 0);
    assert_eq!(alerts.alerts().len(), 1);
}
