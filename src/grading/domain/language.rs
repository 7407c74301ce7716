//! Language offsets and resolved execution limits.

use super::{Constraints, LanguageSpec};
use serde::{Deserialize, Serialize};

/// Per-language execution offsets.
///
/// Offsets compensate for toolchain overhead and are added on top of the
/// task constraints. They are read for every grading run and never written
/// by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    /// Language identifier.
    pub spec: LanguageSpec,
    /// Compilation time limit in milliseconds.
    pub compile_offset_ms: u32,
    /// Extra run time in milliseconds.
    pub run_offset_ms: u32,
    /// Extra memory in megabytes.
    pub memory_offset_mb: u32,
}

impl Language {
    /// Creates a language configuration.
    #[must_use]
    pub const fn new(
        spec: LanguageSpec,
        compile_offset_ms: u32,
        run_offset_ms: u32,
        memory_offset_mb: u32,
    ) -> Self {
        Self {
            spec,
            compile_offset_ms,
            run_offset_ms,
            memory_offset_mb,
        }
    }
}

/// Execution limits after applying language offsets to attempt constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionLimits {
    /// Compilation time limit in milliseconds.
    pub compile_time_ms: u32,
    /// Run time limit per test in milliseconds, when constrained.
    pub run_time_ms: Option<u32>,
    /// Memory limit in megabytes, when constrained.
    pub memory_mb: Option<u32>,
}

impl ExecutionLimits {
    /// Applies `language` offsets to `constraints`.
    ///
    /// Unconstrained dimensions stay unconstrained; offsets saturate instead
    /// of overflowing.
    #[must_use]
    pub fn resolve(constraints: &Constraints, language: &Language) -> Self {
        Self {
            compile_time_ms: language.compile_offset_ms,
            run_time_ms: constraints
                .time_ms
                .map(|time| time.saturating_add(language.run_offset_ms)),
            memory_mb: constraints
                .memory_mb
                .map(|memory| memory.saturating_add(language.memory_offset_mb)),
        }
    }
}
