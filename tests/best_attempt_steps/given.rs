//! Given steps for best-attempt BDD scenarios.

use super::world::BestAttemptWorld;
use rstest_bdd_macros::given;

#[given(r#"a task "{task}" with {tests:usize} tests"#)]
fn task_with_tests(
    world: &mut BestAttemptWorld,
    task: String,
    tests: usize,
) -> Result<(), eyre::Report> {
    world.seed_task(&task, tests)
}

#[given(r#""{user}" earlier submitted attempt "{attempt}" to "{task}" on day {day:u32} graded "{verdicts}""#)]
fn earlier_attempt(
    world: &mut BestAttemptWorld,
    user: String,
    attempt: String,
    task: String,
    day: u32,
    verdicts: String,
) -> Result<(), eyre::Report> {
    world.grade(&user, &attempt, &task, day, &verdicts)
}
