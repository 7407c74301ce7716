//! Then steps for best-attempt BDD scenarios.

use super::world::{BestAttemptWorld, run_async};
use arbiter::grading::{
    domain::{AttemptSnapshot, TaskSpec, UserLogin, UserTaskResult},
    ports::StandingsRepository,
};
use chrono::Datelike;
use rstest_bdd_macros::then;

fn history(world: &BestAttemptWorld, user: &str, task: &str) -> eyre::Result<UserTaskResult> {
    let login = UserLogin::new(user)?;
    let spec = TaskSpec::new(task)?;
    run_async(world.store.find_user_task_result(&login, &spec))?
        .ok_or_else(|| eyre::eyre!("no history for {user} on {task}"))
}

fn latest_best(world: &BestAttemptWorld, user: &str, task: &str) -> eyre::Result<AttemptSnapshot> {
    history(world, user, task)?
        .latest_best()
        .cloned()
        .ok_or_else(|| eyre::eyre!("no best attempt recorded"))
}

#[then(r#"the latest best of "{user}" on "{task}" is "{attempt}" with {percent:u8} percent"#)]
fn latest_best_is(
    world: &BestAttemptWorld,
    user: String,
    task: String,
    attempt: String,
    percent: u8,
) -> Result<(), eyre::Report> {
    let best = latest_best(world, &user, &task)?;
    eyre::ensure!(
        best.attempt.as_str() == attempt,
        "expected best attempt {attempt}, found {}",
        best.attempt
    );
    eyre::ensure!(
        best.percent_tests == percent,
        "expected {percent} percent, found {}",
        best.percent_tests
    );
    Ok(())
}

#[then(r#"the latest best of "{user}" on "{task}" is dated day {day:u32}"#)]
fn latest_best_dated(
    world: &BestAttemptWorld,
    user: String,
    task: String,
    day: u32,
) -> Result<(), eyre::Report> {
    let best = latest_best(world, &user, &task)?;
    eyre::ensure!(
        best.date.day() == day,
        "expected best dated day {day}, found {}",
        best.date
    );
    Ok(())
}

#[then(r#""{user}" has {count:usize} graded attempts on "{task}""#)]
fn graded_attempts(
    world: &BestAttemptWorld,
    user: String,
    count: usize,
    task: String,
) -> Result<(), eyre::Report> {
    let recorded = history(world, &user, &task)?;
    eyre::ensure!(
        recorded.results.len() == count && recorded.bests.len() == count,
        "expected {count} entries, found {} results and {} bests",
        recorded.results.len(),
        recorded.bests.len()
    );
    Ok(())
}

#[then(r#"the rating of "{user}" is {rating:u64}"#)]
fn rating_is(world: &BestAttemptWorld, user: String, rating: u64) -> Result<(), eyre::Report> {
    let login = UserLogin::new(user)?;
    let found = run_async(world.store.find_rating(&login))?.unwrap_or_default();
    eyre::ensure!(found == rating, "expected rating {rating}, found {found}");
    Ok(())
}
