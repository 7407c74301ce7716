//! Exclusive claim of an attempt for grading.

use crate::grading::{
    domain::{AttemptSpec, AttemptStatus},
    ports::{AttemptRepository, GradingStoreResult},
};
use std::sync::Arc;
use tracing::{debug, info};

/// Grants exclusive grading rights through a conditional status change.
pub struct LeaseManager<S>
where
    S: AttemptRepository,
{
    store: Arc<S>,
}

impl<S> LeaseManager<S>
where
    S: AttemptRepository,
{
    /// Creates a lease manager.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Moves `attempt` from pending to testing and mirrors the change.
    ///
    /// Both writes are issued together. The claim succeeds only when the
    /// attempt record itself was modified, so of any number of concurrent
    /// claims at most one wins. A missing or already claimed attempt yields
    /// `false`.
    ///
    /// # Errors
    ///
    /// Returns storage errors from either write.
    pub async fn try_claim(&self, attempt: &AttemptSpec) -> GradingStoreResult<bool> {
        let (modified, mirrored) = tokio::try_join!(
            self.store
                .transition_status(attempt, AttemptStatus::Pending, AttemptStatus::Testing),
            self.store.set_status_mirror(attempt, AttemptStatus::Testing),
        )?;
        let claimed = modified == 1;
        if claimed {
            debug!(attempt = %attempt, mirrored, "claimed attempt");
        } else {
            info!(attempt = %attempt, modified, "attempt already claimed");
        }
        Ok(claimed)
    }
}
