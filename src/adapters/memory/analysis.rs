//! In-memory analysis event store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::event::AnalysisEvent;
use crate::domain::foundation::{ActorId, DomainError, ErrorCode};
use crate::ports::AnalysisStore;

/// In-memory [`AnalysisStore`] with error injection.
#[derive(Default)]
pub struct InMemoryAnalysisStore {
    events: RwLock<Vec<AnalysisEvent>>,
    failing: AtomicBool,
}

impl InMemoryAnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: AnalysisEvent) {
        self.events
            .write()
            .expect("InMemoryAnalysisStore: events lock poisoned")
            .push(event);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl AnalysisStore for InMemoryAnalysisStore {
    async fn recent_events(
        &self,
        actor: &ActorId,
        limit: usize,
    ) -> Result<Vec<AnalysisEvent>, DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::HistoryUnavailable,
                "analysis store unavailable",
            ));
        }

        let mut events: Vec<AnalysisEvent> = self
            .events
            .read()
            .expect("InMemoryAnalysisStore: events lock poisoned")
            .iter()
            .filter(|event| &event.actor == actor)
            .cloned()
            .collect();

        // Most recent `limit` events, returned oldest first.
        events.sort_by_key(|event| event.occurred_at.as_unix_secs());
        if events.len() > limit {
            events.drain(..events.len() - limit);
        }
        Ok(events)
    }
}
