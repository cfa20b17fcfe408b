//! AnalysisStore port for historical analysis events.

use async_trait::async_trait;

use crate::domain::event::AnalysisEvent;
use crate::domain::foundation::{ActorId, DomainError};

/// Read access to prior analysis events for an actor.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Returns up to `limit` most recent events, oldest first.
    ///
    /// Fails with `HistoryUnavailable` when the store is unreachable;
    /// callers degrade to "no signals" rather than aborting the whole
    /// reconciliation.
    async fn recent_events(
        &self,
        actor: &ActorId,
        limit: usize,
    ) -> Result<Vec<AnalysisEvent>, DomainError>;
}
