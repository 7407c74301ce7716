//! When steps for best-attempt BDD scenarios.

use super::world::BestAttemptWorld;
use arbiter::grading::services::GradingOutcome;
use rstest_bdd_macros::when;

#[when(r#""{user}" submits attempt "{attempt}" to "{task}" on day {day:u32} graded "{verdicts}""#)]
fn submit_attempt(
    world: &mut BestAttemptWorld,
    user: String,
    attempt: String,
    task: String,
    day: u32,
    verdicts: String,
) -> Result<(), eyre::Report> {
    world.grade(&user, &attempt, &task, day, &verdicts)?;
    match world.last_outcome {
        Some(GradingOutcome::Graded(_)) => Ok(()),
        ref other => Err(eyre::eyre!("expected a graded outcome, got {other:?}")),
    }
}
