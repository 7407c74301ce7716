//! Grading orchestration for submitted attempts.
//!
//! This module claims exclusive ownership of an attempt, routes it to the
//! verdict-producing strategy for its task, aggregates per-test verdicts into
//! a final result, and persists attempt history and ratings. Every claimed
//! attempt reaches the `finished` state, including when a strategy fails. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
