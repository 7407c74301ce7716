//! Application services orchestrating one grading pass.

mod dispatch;
mod lease;
mod loader;
mod manager;
mod persister;
mod resolver;
mod supervisor;

pub use dispatch::{CheckerSet, DispatchError, resolve_route};
pub use lease::LeaseManager;
pub use loader::{AttemptLoader, LoadError, LoadedAttempt};
pub use manager::{
    GradingError, GradingManager, GradingOutcome, HandlerError, LEASE_LOST_LOG,
    MISSING_CHECKER_LOG, ManagerSettings,
};
pub use persister::{PersistError, ResultPersister};
pub use resolver::LanguageResolver;
pub use supervisor::FailureSupervisor;
