//! In-memory source mapping and history stores.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, WorkspaceId};
use crate::domain::sources::SourceFamily;
use crate::ports::{HistoryStore, RawItem, SourceMapping, SourceMappingStore};

/// In-memory [`SourceMappingStore`].
#[derive(Default)]
pub struct InMemorySourceMappingStore {
    mappings: RwLock<Vec<SourceMapping>>,
}

impl InMemorySourceMappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mapping(
        &self,
        workspace_id: WorkspaceId,
        family: SourceFamily,
        external_ref: impl Into<String>,
    ) {
        self.mappings
            .write()
            .expect("InMemorySourceMappingStore: mappings lock poisoned")
            .push(SourceMapping {
                workspace_id,
                source_kind: family,
                external_ref: external_ref.into(),
            });
    }
}

#[async_trait]
impl SourceMappingStore for InMemorySourceMappingStore {
    async fn resolve_mappings(
        &self,
        workspace_id: &WorkspaceId,
        family: SourceFamily,
    ) -> Result<Vec<SourceMapping>, DomainError> {
        Ok(self
            .mappings
            .read()
            .expect("InMemorySourceMappingStore: mappings lock poisoned")
            .iter()
            .filter(|m| &m.workspace_id == workspace_id && m.source_kind == family)
            .cloned()
            .collect())
    }
}

/// In-memory [`HistoryStore`] keyed by external reference, with per-source
/// error injection.
#[derive(Default)]
pub struct InMemoryHistoryStore {
    items: RwLock<HashMap<String, Vec<RawItem>>>,
    failing_refs: RwLock<HashSet<String>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_item(&self, external_ref: impl Into<String>, item: RawItem) {
        self.items
            .write()
            .expect("InMemoryHistoryStore: items lock poisoned")
            .entry(external_ref.into())
            .or_default()
            .push(item);
    }

    /// Makes one source unreachable.
    pub fn fail_source(&self, external_ref: impl Into<String>) {
        self.failing_refs
            .write()
            .expect("InMemoryHistoryStore: failing lock poisoned")
            .insert(external_ref.into());
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn recent_items(
        &self,
        mapping: &SourceMapping,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<RawItem>, DomainError> {
        if self
            .failing_refs
            .read()
            .expect("InMemoryHistoryStore: failing lock poisoned")
            .contains(&mapping.external_ref)
        {
            return Err(DomainError::new(
                ErrorCode::SourceUnavailable,
                format!("source '{}' unreachable", mapping.external_ref),
            ));
        }

        Ok(self
            .items
            .read()
            .expect("InMemoryHistoryStore: items lock poisoned")
            .get(&mapping.external_ref)
            .map(|items| {
                items
                    .iter()
                    .filter(|item| {
                        !item.occurred_at.is_before(&start) && !item.occurred_at.is_after(&end)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
