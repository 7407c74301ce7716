//! Arbiter: grading orchestration for an automated assessment platform.
//!
//! One grading pass claims a submitted attempt, routes it to a grading
//! strategy, aggregates the per-test verdicts and records the outcome in the
//! attempt, the author's task history and the author's rating. Failures in a
//! strategy are contained so that every claimed attempt reaches a terminal
//! state.
//!
//! - [`grading`] holds the domain, ports, adapters and services
//! - [`config`] reads process configuration
//! - [`telemetry`] installs logging

pub mod config;
pub mod grading;
pub mod telemetry;
