//! Runs one grading pass for a submitted attempt.
//!
//! Usage:
//!
//! ```text
//! arbiter <attempt> <author> <task>
//! ```
//!
//! Configuration is read from the environment; see [`arbiter::config`].

use std::process::ExitCode;
use std::sync::Arc;

use arbiter::config::ArbiterConfig;
use arbiter::grading::adapters::TracingAlertSink;
use arbiter::grading::adapters::postgres::{GradingPgPool, PostgresGradingStore};
use arbiter::grading::domain::{AttemptSpec, TaskSpec, UserLogin};
use arbiter::grading::services::{CheckerSet, GradingManager, GradingOutcome, ManagerSettings};
use arbiter::telemetry::init_tracing;
use clap::Parser;
use diesel::pg::PgConnection;
use diesel::r2d2::ConnectionManager;
use eyre::WrapErr;
use mockable::DefaultClock;
use tracing::{error, info};

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "arbiter", about = "Grade one submitted attempt")]
struct Cli {
    /// Attempt identifier.
    attempt: String,
    /// Author login.
    author: String,
    /// Task identifier.
    task: String,
}

type Manager = GradingManager<PostgresGradingStore, TracingAlertSink, DefaultClock>;

fn build_manager(config: &ArbiterConfig) -> eyre::Result<Manager> {
    let pool: GradingPgPool = GradingPgPool::builder()
        .max_size(config.pool_size)
        .build(ConnectionManager::<PgConnection>::new(&config.database_url))
        .wrap_err("failed to build database pool")?;
    let checkers = CheckerSet::new(
        Arc::new(config.checkers.text.clone()),
        Arc::new(config.checkers.tests.clone()),
        Arc::new(config.checkers.custom.clone()),
    );

    Ok(GradingManager::new(
        Arc::new(PostgresGradingStore::new(pool)),
        checkers,
        Arc::new(TracingAlertSink::new()),
        Arc::new(DefaultClock),
        ManagerSettings::new(config.workspace_root.clone()),
    ))
}

async fn run(manager: &Manager, cli: Cli) -> eyre::Result<GradingOutcome> {
    let attempt = AttemptSpec::new(cli.attempt)?;
    let author = UserLogin::new(cli.author)?;
    let task = TaskSpec::new(cli.task)?;
    let outcome = manager.start(&attempt, &author, &task).await?;
    Ok(outcome)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match ArbiterConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            init_tracing(arbiter::config::LogFormat::default());
            error!(error = %err, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(config.log_format);

    let manager = match build_manager(&config) {
        Ok(manager) => manager,
        Err(err) => {
            error!(error = ?err, "failed to start");
            return ExitCode::FAILURE;
        }
    };

    match run(&manager, cli).await {
        Ok(outcome) => {
            info!(outcome = ?outcome, "grading pass complete");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = ?err, "grading pass aborted");
            ExitCode::FAILURE
        }
    }
}
