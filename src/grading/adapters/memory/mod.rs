//! In-memory adapters for grading tests and local runs.

mod alert;
mod checker;
mod store;

pub use alert::RecordingAlertSink;
pub use checker::{ScriptedChecker, ScriptedOutcome};
pub use store::{InMemoryGradingStore, StoreWrite};
