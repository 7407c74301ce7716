//! Process configuration read from the environment.
//!
//! A `.env` file in the working directory, when present, seeds variables
//! that are not already set.

use crate::grading::adapters::ProcessChecker;
use camino::Utf8PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Default size of the database connection pool.
pub const DEFAULT_POOL_SIZE: u32 = 4;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("{0} must be set")]
    Missing(&'static str),
    /// A variable holds an unusable value.
    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" | "" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::Invalid {
                name: "ARBITER_LOG_FORMAT",
                value: value.to_owned(),
                reason: "expected pretty or json",
            }),
        }
    }
}

/// External checker commands, one per route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerCommands {
    /// Text comparison strategy.
    pub text: ProcessChecker,
    /// Compile, run and compare strategy.
    pub tests: ProcessChecker,
    /// Custom checker strategy.
    pub custom: ProcessChecker,
}

/// Complete process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArbiterConfig {
    /// `PostgreSQL` connection URL.
    pub database_url: String,
    /// Maximum number of pooled connections.
    pub pool_size: u32,
    /// Directory under which program workspaces are created.
    pub workspace_root: Utf8PathBuf,
    /// Strategy commands.
    pub checkers: CheckerCommands,
    /// Log output format.
    pub log_format: LogFormat,
}

impl ArbiterConfig {
    /// Reads configuration from the process environment, after loading a
    /// `.env` file if one exists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a
    /// value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is the normal case in deployments.
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a
    /// value is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let require = |name: &'static str| read(name).ok_or(ConfigError::Missing(name));
        let checker = |name: &'static str| {
            require(name).and_then(|line| {
                ProcessChecker::from_command_line(&line).ok_or(ConfigError::Missing(name))
            })
        };

        let pool_size = match read("ARBITER_DB_POOL_SIZE") {
            None => DEFAULT_POOL_SIZE,
            Some(raw) => match raw.parse::<u32>() {
                Ok(size) if size > 0 => size,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "ARBITER_DB_POOL_SIZE",
                        value: raw,
                        reason: "expected a positive integer",
                    });
                }
            },
        };
        let workspace_root = match read("ARBITER_WORKSPACE_ROOT") {
            Some(root) => Utf8PathBuf::from(root),
            None => default_workspace_root()?,
        };
        let log_format = read("ARBITER_LOG_FORMAT")
            .map_or(Ok(LogFormat::default()), |raw| raw.parse())?;

        Ok(Self {
            database_url: require("DATABASE_URL")?,
            pool_size,
            workspace_root,
            checkers: CheckerCommands {
                text: checker("ARBITER_TEXT_CHECKER")?,
                tests: checker("ARBITER_TESTS_CHECKER")?,
                custom: checker("ARBITER_CUSTOM_CHECKER")?,
            },
            log_format,
        })
    }
}

fn default_workspace_root() -> Result<Utf8PathBuf, ConfigError> {
    let temp = std::env::temp_dir();
    let root = Utf8PathBuf::from_path_buf(temp).map_err(|path| ConfigError::Invalid {
        name: "ARBITER_WORKSPACE_ROOT",
        value: path.display().to_string(),
        reason: "system temporary directory is not UTF-8",
    })?;
    Ok(root.join("arbiter"))
}
