//! Unit tests for the grading module.
//!
//! Domain tests cover identifiers, verdicts, aggregation, grouping and the
//! standings merge; service tests drive the orchestration against the
//! in-memory store with mocked strategies and alert sinks.

mod support;
