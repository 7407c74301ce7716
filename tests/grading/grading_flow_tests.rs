//! End-to-end grading passes against the in-memory store.

use std::sync::Arc;

use super::helpers::{day, manager, seed_attempt, seed_task, stored_attempt, workspace_root};
use arbiter::grading::{
    adapters::memory::{InMemoryGradingStore, RecordingAlertSink, ScriptedChecker},
    domain::{AttemptStatus, CheckType, FinalVerdict, TaskType, UserLogin, Verdict},
    ports::{AttemptRepository, CheckJob, StandingsRepository},
    services::GradingOutcome,
};
use rstest::{fixture, rstest};

#[fixture]
fn store() -> Arc<InMemoryGradingStore> {
    Arc::new(InMemoryGradingStore::new())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn text_attempt_finishes_with_first_failure(store: Arc<InMemoryGradingStore>) {
    let task = seed_task(&store, "essay", 4).expect("seed task");
    let submission = seed_attempt(
        &store,
        "attempt-1",
        "alice",
        &task,
        (TaskType::Text, CheckType::TestsChecker),
        day(1).expect("date"),
    )
    .expect("seed attempt");
    let checker = Arc::new(ScriptedChecker::reporting(vec![
        Verdict::Ok,
        Verdict::Ok,
        Verdict::WrongAnswer,
        Verdict::Ok,
    ]));
    let alerts = RecordingAlertSink::new();
    let (_dir, root) = workspace_root().expect("workspace root");
    let manager = manager(&store, Arc::clone(&checker) as _, &alerts, root);

    let outcome = manager
        .start(&submission.attempt, &submission.author, &submission.task)
        .await
        .expect("pass runs");

    assert_eq!(
        outcome,
        GradingOutcome::Graded(FinalVerdict {
            verdict: Verdict::WrongAnswer,
            verdict_test: 3,
        })
    );
    assert_eq!(checker.call_count(), 1);
    assert!(matches!(checker.jobs().first(), Some(CheckJob::Text(_))));
    let stored = stored_attempt(&store, &submission.attempt)
        .await
        .expect("read attempt");
    assert_eq!(stored.status(), AttemptStatus::Finished);
    assert_eq!(
        store
            .status_mirror(&submission.attempt)
            .expect("read mirror"),
        Some(AttemptStatus::Finished)
    );
    assert!(
        store
            .find_grading_job(&submission.attempt)
            .await
            .expect("read job")
            .is_none()
    );
    let standings = store
        .find_user_task_result(&submission.author, &submission.task)
        .await
        .expect("read standings")
        .expect("standings created");
    assert_eq!(standings.results.len(), 1);
    assert_eq!(
        standings.latest_best().map(|best| best.percent_tests),
        Some(75)
    );
    assert!(alerts.alerts().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn one_manager_grades_successive_attempts(store: Arc<InMemoryGradingStore>) {
    let task = seed_task(&store, "sum", 3).expect("seed task");
    let checker = Arc::new(ScriptedChecker::uniform(Verdict::Ok));
    let alerts = RecordingAlertSink::new();
    let (_dir, root) = workspace_root().expect("workspace root");
    let manager = manager(&store, Arc::clone(&checker) as _, &alerts, root.clone());

    for (index, name) in ["attempt-1", "attempt-2", "attempt-3"].iter().enumerate() {
        let date = day(u32::try_from(index + 1).expect("small day")).expect("date");
        let submission = seed_attempt(
            &store,
            name,
            "bob",
            &task,
            (TaskType::Code, CheckType::TestsChecker),
            date,
        )
        .expect("seed attempt");
        let outcome = manager
            .start(&submission.attempt, &submission.author, &submission.task)
            .await
            .expect("pass runs");
        assert_eq!(
            outcome,
            GradingOutcome::Graded(FinalVerdict {
                verdict: Verdict::Ok,
                verdict_test: 3,
            })
        );
    }

    assert_eq!(checker.call_count(), 3);
    let author = UserLogin::new("bob").expect("login");
    assert_eq!(store.find_rating(&author).await.expect("read rating"), Some(1));
    let standings = store
        .find_user_task_result(&author, &task.spec)
        .await
        .expect("read standings")
        .expect("standings exist");
    assert_eq!(standings.results.len(), 3);
    let best_attempts: Vec<&str> = standings
        .bests
        .iter()
        .map(|best| best.attempt.as_str())
        .collect();
    assert_eq!(best_attempts, vec!["attempt-1", "attempt-1", "attempt-1"]);
    assert_eq!(std::fs::read_dir(&root).map_or(0, Iterator::count), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn improving_attempt_replaces_best_and_earns_rating(store: Arc<InMemoryGradingStore>) {
    let task = seed_task(&store, "graph", 2).expect("seed task");
    let alerts = RecordingAlertSink::new();
    let (_dir, root) = workspace_root().expect("workspace root");
    let rounds = [
        ("attempt-1", vec![Verdict::Ok, Verdict::TimeLimitExceeded]),
        ("attempt-2", vec![Verdict::WrongAnswer, Verdict::WrongAnswer]),
        ("attempt-3", vec![Verdict::Ok, Verdict::Ok]),
    ];

    for (index, (name, verdicts)) in rounds.into_iter().enumerate() {
        let date = day(u32::try_from(index + 1).expect("small day")).expect("date");
        let submission = seed_attempt(
            &store,
            name,
            "carol",
            &task,
            (TaskType::Code, CheckType::TestsChecker),
            date,
        )
        .expect("seed attempt");
        let checker = Arc::new(ScriptedChecker::reporting(verdicts));
        manager(&store, checker, &alerts, root.clone())
            .start(&submission.attempt, &submission.author, &submission.task)
            .await
            .expect("pass runs");
    }

    let author = UserLogin::new("carol").expect("login");
    let standings = store
        .find_user_task_result(&author, &task.spec)
        .await
        .expect("read standings")
        .expect("standings exist");
    let bests: Vec<(&str, u8)> = standings
        .bests
        .iter()
        .map(|best| (best.attempt.as_str(), best.percent_tests))
        .collect();
    assert_eq!(
        bests,
        vec![("attempt-1", 50), ("attempt-1", 50), ("attempt-3", 100)]
    );
    assert_eq!(store.find_rating(&author).await.expect("read rating"), Some(1));
}
