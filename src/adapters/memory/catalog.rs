//! In-memory catalog store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::catalog::{CatalogFilter, PatternCatalogEntry};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::CatalogStore;

/// In-memory [`CatalogStore`] with error injection.
///
/// # Panics
///
/// Methods may panic if internal locks are poisoned; acceptable for test
/// code only.
#[derive(Default)]
pub struct InMemoryCatalogStore {
    entries: RwLock<Vec<PatternCatalogEntry>>,
    failing: AtomicBool,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<PatternCatalogEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
            failing: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent call fail with `CatalogUnavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn insert(&self, entry: PatternCatalogEntry) {
        self.entries
            .write()
            .expect("InMemoryCatalogStore: entries lock poisoned")
            .push(entry);
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn list_active(
        &self,
        filter: &CatalogFilter,
    ) -> Result<Vec<PatternCatalogEntry>, DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::CatalogUnavailable,
                "catalog store unavailable",
            ));
        }

        let entries = self
            .entries
            .read()
            .expect("InMemoryCatalogStore: entries lock poisoned");

        Ok(entries
            .iter()
            .filter(|entry| {
                filter.ceremony_types.is_empty()
                    || filter
                        .ceremony_types
                        .iter()
                        .any(|ceremony| entry.applies_to(*ceremony))
            })
            .cloned()
            .collect())
    }
}
