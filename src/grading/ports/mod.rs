//! Port contracts for attempt grading.
//!
//! Ports define infrastructure-agnostic interfaces used by grading services:
//! the document store, the grading strategies and the operator alert channel.

mod alert;
mod attempts;
mod catalog;
mod checker;
mod error;
mod standings;

pub use alert::{Alert, AlertKind, AlertSink};
pub use attempts::AttemptRepository;
pub use catalog::CatalogRepository;
pub use checker::{
    CheckJob, CheckReport, Checker, CheckerError, CheckerResult, CustomCheckJob, TestsCheckJob,
    TextCheckJob,
};
pub use error::{GradingStoreError, GradingStoreResult};
pub use standings::StandingsRepository;

/// Every storage port the grading services need, backed by one store.
pub trait GradingStore: AttemptRepository + CatalogRepository + StandingsRepository {}

impl<T> GradingStore for T where T: AttemptRepository + CatalogRepository + StandingsRepository {}
