//! Grading strategy backed by an external checker process.
//!
//! The process receives the [`CheckJob`] as JSON on standard input and must
//! print a [`CheckReport`] as JSON on standard output, then exit with status
//! zero. Sandboxing, compilation and comparison all happen inside that
//! process.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::grading::ports::{CheckJob, CheckReport, Checker, CheckerError, CheckerResult};

/// Checker that delegates grading to an external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessChecker {
    program: String,
    args: Vec<String>,
}

impl ProcessChecker {
    /// Creates a checker running `program` with `args`.
    #[must_use]
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = String>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().collect(),
        }
    }

    /// Parses a whitespace-separated command line.
    ///
    /// Returns `None` for a blank command line.
    #[must_use]
    pub fn from_command_line(command_line: &str) -> Option<Self> {
        let mut words = command_line.split_whitespace().map(str::to_owned);
        let program = words.next()?;
        Some(Self::new(program, words))
    }

    /// Returns the program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl Checker for ProcessChecker {
    async fn check(&self, job: &CheckJob) -> CheckerResult<CheckReport> {
        let payload = serde_json::to_vec(job).map_err(CheckerError::protocol)?;
        debug!(
            program = %self.program,
            route = %job.route(),
            attempt = %job.attempt(),
            "spawning checker process"
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(CheckerError::runtime)?;

        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut pipe) = stdin {
                pipe.write_all(&payload).await?;
                pipe.shutdown().await?;
            }
            Ok::<(), std::io::Error>(())
        };
        let (fed, waited) = tokio::join!(feed, child.wait_with_output());
        let output = waited.map_err(CheckerError::runtime)?;

        if !output.status.success() {
            return Err(CheckerError::Exited {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        // A checker may exit without draining its input.
        match fed {
            Err(err) if err.kind() != std::io::ErrorKind::BrokenPipe => {
                return Err(CheckerError::runtime(err));
            }
            _ => {}
        }

        serde_json::from_slice(&output.stdout).map_err(CheckerError::protocol)
    }
}
