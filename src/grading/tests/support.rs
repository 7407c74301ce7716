//! Shared builders for grading unit tests.

use crate::grading::{
    adapters::memory::InMemoryGradingStore,
    domain::{
        Attempt, AttemptSpec, CheckType, Constraints, GradingJob, Language, LanguageSpec,
        TaskLayout, TaskSpec, TaskTest, TaskType, TestGroup, TestSpec, UserLogin,
    },
};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

pub(super) fn attempt_spec(value: &str) -> AttemptSpec {
    AttemptSpec::new(value).expect("valid attempt spec")
}

pub(super) fn task_spec(value: &str) -> TaskSpec {
    TaskSpec::new(value).expect("valid task spec")
}

pub(super) fn test_spec(value: &str) -> TestSpec {
    TestSpec::new(value).expect("valid test spec")
}

pub(super) fn user(value: &str) -> UserLogin {
    UserLogin::new(value).expect("valid user login")
}

pub(super) fn language_spec(value: &str) -> LanguageSpec {
    LanguageSpec::new(value).expect("valid language spec")
}

pub(super) fn day(number: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, number, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn test_specs(count: usize) -> Vec<TestSpec> {
    (1..=count).map(|index| test_spec(&format!("t{index}"))).collect()
}

pub(super) fn task_tests(count: usize) -> Vec<TaskTest> {
    test_specs(count)
        .into_iter()
        .enumerate()
        .map(|(index, spec)| TaskTest::new(spec, format!("in-{index}"), format!("out-{index}")))
        .collect()
}

/// A seeded store holding one queued attempt.
pub(super) struct Scenario {
    pub store: Arc<InMemoryGradingStore>,
    pub attempt: AttemptSpec,
    pub author: UserLogin,
    pub task: TaskSpec,
}

pub(super) fn scenario(task_type: TaskType, check_type: CheckType, tests: usize) -> Scenario {
    scenario_with_groups(task_type, check_type, tests, Vec::new())
}

pub(super) fn scenario_with_groups(
    task_type: TaskType,
    check_type: CheckType,
    tests: usize,
    groups: Vec<TestGroup>,
) -> Scenario {
    let store = Arc::new(InMemoryGradingStore::new());
    let attempt = attempt_spec("attempt-1");
    let author = user("alice");
    let task = task_spec("task-1");

    let record = Attempt::new(attempt.clone(), author.clone(), language_spec("python3"), day(2))
        .with_constraints(Constraints {
            time_ms: Some(1000),
            memory_mb: Some(64),
        })
        .with_tests(test_specs(tests))
        .with_text_answers((0..tests).map(|index| format!("answer-{index}")))
        .with_program("print(input())");
    store.seed_attempt(record).expect("seed attempt");
    store
        .seed_task_layout(TaskLayout {
            spec: task.clone(),
            tests: test_specs(tests),
            test_groups: groups,
        })
        .expect("seed layout");
    store.seed_tests(task_tests(tests)).expect("seed tests");
    store
        .seed_language(Language::new(language_spec("python3"), 2000, 100, 16))
        .expect("seed language");
    store
        .seed_grading_job(GradingJob::new(attempt.clone(), task_type, check_type))
        .expect("seed job");

    Scenario {
        store,
        attempt,
        author,
        task,
    }
}
