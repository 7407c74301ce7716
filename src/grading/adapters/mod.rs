//! Adapter implementations for grading ports.

pub mod memory;
pub mod postgres;

mod alert;
mod process;
mod workspace;

pub use alert::TracingAlertSink;
pub use process::ProcessChecker;
pub use workspace::{ProgramWorkspace, WorkspaceError};
