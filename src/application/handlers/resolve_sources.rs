//! ResolveSourcesHandler - Query handler for source window resolution.
//!
//! For each windowed source family mapped to the workspace, fetches recent
//! activity inside the family's relevance window and judges the family's
//! contribution. Unreachable sources degrade to zero confidence with a
//! warning; they never abort resolution.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::debug;

use crate::domain::detection::TextUnit;
use crate::domain::foundation::{Timestamp, WorkspaceId};
use crate::domain::report::{Warning, WarningComponent};
use crate::domain::sources::{ContributingSource, SourceFamily, WindowPolicy};
use crate::ports::{HistoryStore, RawItem, SourceMapping, SourceMappingStore};

/// Query to resolve contributing sources around one analysis timestamp.
#[derive(Debug, Clone)]
pub struct ResolveSourcesQuery {
    pub workspace_id: WorkspaceId,
    /// Center of the relevance windows.
    pub analysis_time: Timestamp,
}

/// Result of source resolution: the judged contributions plus the raw text
/// units feeding the matcher. Raw text stays in memory only; it is reduced
/// to bounded excerpts before anything is persisted.
#[derive(Debug, Clone, Default)]
pub struct ResolvedSources {
    pub contributing: Vec<ContributingSource>,
    pub units: Vec<TextUnit>,
    pub warnings: Vec<Warning>,
}

/// Resolves which mapped sources contributed activity around an analysis.
pub struct ResolveSourcesHandler {
    mapping_store: Arc<dyn SourceMappingStore>,
    history_store: Arc<dyn HistoryStore>,
    policy: WindowPolicy,
    source_timeout: Duration,
}

impl ResolveSourcesHandler {
    pub fn new(
        mapping_store: Arc<dyn SourceMappingStore>,
        history_store: Arc<dyn HistoryStore>,
        policy: WindowPolicy,
        source_timeout: Duration,
    ) -> Self {
        Self {
            mapping_store,
            history_store,
            policy,
            source_timeout,
        }
    }

    /// Resolves all windowed families concurrently.
    ///
    /// # Edge Cases
    /// - A family with no mappings is not considered at all (only explicit
    ///   mappings participate).
    /// - A mapped family with no activity inside its window is emitted with
    ///   zero confidence: absence is a signal, not a gap.
    /// - A family whose mappings all fail or time out is emitted with zero
    ///   confidence plus a warning.
    pub async fn handle(&self, query: ResolveSourcesQuery) -> ResolvedSources {
        let families = join_all(
            SourceFamily::WINDOWED
                .iter()
                .map(|family| self.resolve_family(&query, *family)),
        )
        .await;

        let mut resolved = ResolvedSources::default();
        for outcome in families {
            resolved.warnings.extend(outcome.warnings);
            if let Some(contribution) = outcome.contribution {
                resolved.contributing.push(contribution);
            }
            resolved.units.extend(outcome.units);
        }

        debug!(
            workspace_id = %query.workspace_id,
            sources = resolved.contributing.len(),
            units = resolved.units.len(),
            warnings = resolved.warnings.len(),
            "Resolved contributing sources"
        );
        resolved
    }

    async fn resolve_family(
        &self,
        query: &ResolveSourcesQuery,
        family: SourceFamily,
    ) -> FamilyOutcome {
        let mut outcome = FamilyOutcome::default();

        let mappings = match self
            .mapping_store
            .resolve_mappings(&query.workspace_id, family)
            .await
        {
            Ok(mappings) => mappings,
            Err(err) => {
                outcome.warnings.push(Warning::new(
                    WarningComponent::SourceResolver,
                    format!("mapping resolution failed for {family}: {}", err.message),
                ));
                return outcome;
            }
        };

        if mappings.is_empty() {
            // Not mapped: the family is not considered for this workspace.
            return outcome;
        }

        let window = match self.policy.window_for(family, query.analysis_time) {
            Some(window) => window,
            None => return outcome,
        };

        let fetches = join_all(
            mappings
                .iter()
                .map(|mapping| self.fetch_mapping(mapping, window.start, window.end)),
        )
        .await;

        let mut items: Vec<RawItem> = Vec::new();
        let mut failures = 0usize;
        for (mapping, fetched) in mappings.iter().zip(fetches) {
            match fetched {
                Ok(batch) => {
                    items.extend(
                        batch
                            .into_iter()
                            .filter(|item| window.contains(&item.occurred_at)),
                    );
                }
                Err(message) => {
                    failures += 1;
                    outcome.warnings.push(Warning::new(
                        WarningComponent::SourceResolver,
                        format!("{family} source '{}': {message}", mapping.external_ref),
                    ));
                }
            }
        }

        let contribution = if items.is_empty() {
            if failures == mappings.len() && failures > 0 {
                debug!(%family, failures, "All mappings for family unavailable");
            }
            ContributingSource::absent(family)
        } else {
            let confidence = self.policy.confidence_for(family, items.len());
            ContributingSource::relevant(family, confidence, items.len())
        }
        .with_metadata("mapped_sources", serde_json::json!(mappings.len()));

        outcome.units = items
            .into_iter()
            .map(|item| {
                let unit = TextUnit::new(family, item.text);
                match item.hint {
                    Some(hint) => unit.with_hint(hint),
                    None => unit,
                }
            })
            .collect();
        outcome.contribution = Some(contribution);
        outcome
    }

    /// One mapping fetch, bounded by the per-source timeout.
    async fn fetch_mapping(
        &self,
        mapping: &SourceMapping,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<RawItem>, String> {
        match tokio::time::timeout(
            self.source_timeout,
            self.history_store.recent_items(mapping, start, end),
        )
        .await
        {
            Ok(Ok(items)) => Ok(items),
            Ok(Err(err)) => Err(err.message),
            Err(_) => Err(format!(
                "timed out after {}s",
                self.source_timeout.as_secs()
            )),
        }
    }
}

#[derive(Debug, Default)]
struct FamilyOutcome {
    contribution: Option<ContributingSource>,
    units: Vec<TextUnit>,
    warnings: Vec<Warning>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    use crate::domain::foundation::{DomainError, ErrorCode};

    // ─────────────────────────────────────────────────────────────────────
    // Mock Implementations
    // ─────────────────────────────────────────────────────────────────────

    struct MockMappingStore {
        mappings: Vec<SourceMapping>,
        should_fail: bool,
    }

    #[async_trait]
    impl SourceMappingStore for MockMappingStore {
        async fn resolve_mappings(
            &self,
            workspace_id: &WorkspaceId,
            family: SourceFamily,
        ) -> Result<Vec<SourceMapping>, DomainError> {
            if self.should_fail {
                return Err(DomainError::new(
                    ErrorCode::MappingUnavailable,
                    "mapping store down",
                ));
            }
            Ok(self
                .mappings
                .iter()
                .filter(|m| &m.workspace_id == workspace_id && m.source_kind == family)
                .cloned()
                .collect())
        }
    }

    #[derive(Default)]
    struct MockHistoryStore {
        /// Items per external_ref.
        items: HashMap<String, Vec<RawItem>>,
        failing_refs: Vec<String>,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl HistoryStore for MockHistoryStore {
        async fn recent_items(
            &self,
            mapping: &SourceMapping,
            _start: Timestamp,
            _end: Timestamp,
        ) -> Result<Vec<RawItem>, DomainError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.failing_refs.contains(&mapping.external_ref) {
                return Err(DomainError::new(
                    ErrorCode::SourceUnavailable,
                    "integration unreachable",
                ));
            }
            Ok(self
                .items
                .get(&mapping.external_ref)
                .cloned()
                .unwrap_or_default())
        }
    }

    fn workspace() -> WorkspaceId {
        WorkspaceId::new("ws-1").unwrap()
    }

    fn mapping(family: SourceFamily, external_ref: &str) -> SourceMapping {
        SourceMapping {
            workspace_id: workspace(),
            source_kind: family,
            external_ref: external_ref.to_string(),
        }
    }

    fn item(at: Timestamp, text: &str) -> RawItem {
        RawItem {
            occurred_at: at,
            text: text.to_string(),
            hint: None,
        }
    }

    fn handler(
        mappings: Vec<SourceMapping>,
        history: MockHistoryStore,
    ) -> ResolveSourcesHandler {
        ResolveSourcesHandler::new(
            Arc::new(MockMappingStore {
                mappings,
                should_fail: false,
            }),
            Arc::new(history),
            WindowPolicy::default(),
            Duration::from_secs(5),
        )
    }

    fn query(center: Timestamp) -> ResolveSourcesQuery {
        ResolveSourcesQuery {
            workspace_id: workspace(),
            analysis_time: center,
        }
    }

    #[tokio::test]
    async fn unmapped_families_are_not_considered() {
        let h = handler(vec![], MockHistoryStore::default());
        let resolved = h.handle(query(Timestamp::from_unix_secs(1_700_000_000))).await;

        assert!(resolved.contributing.is_empty());
        assert!(resolved.units.is_empty());
        assert!(resolved.warnings.is_empty());
    }

    #[tokio::test]
    async fn mapped_family_without_activity_is_absent_with_zero_confidence() {
        let h = handler(
            vec![mapping(SourceFamily::Chat, "chan-1")],
            MockHistoryStore::default(),
        );
        let resolved = h.handle(query(Timestamp::from_unix_secs(1_700_000_000))).await;

        assert_eq!(resolved.contributing.len(), 1);
        let chat = &resolved.contributing[0];
        assert_eq!(chat.source_kind, SourceFamily::Chat);
        assert!(!chat.is_relevant);
        assert_eq!(chat.confidence.value(), 0.0);
    }

    #[tokio::test]
    async fn chat_items_inside_window_drive_the_confidence_formula() {
        let center = Timestamp::from_unix_secs(1_700_000_000);
        let mut history = MockHistoryStore::default();
        history.items.insert(
            "chan-1".to_string(),
            vec![
                item(center.minus_hours(1), "blocked on review"),
                item(center.plus_hours(2), "still waiting"),
                // Outside the 6h chat window: filtered out.
                item(center.minus_hours(9), "old message"),
            ],
        );

        let h = handler(vec![mapping(SourceFamily::Chat, "chan-1")], history);
        let resolved = h.handle(query(center)).await;

        let chat = &resolved.contributing[0];
        assert!(chat.is_relevant);
        assert_eq!(chat.item_count, 2);
        // min(0.95, 0.70 + 0.05 * 2)
        assert!((chat.confidence.value() - 0.80).abs() < 1e-9);
        assert_eq!(resolved.units.len(), 2);
    }

    #[tokio::test]
    async fn unreachable_source_degrades_to_zero_confidence_with_warning() {
        let history = MockHistoryStore {
            failing_refs: vec!["chan-1".to_string()],
            ..Default::default()
        };
        let h = handler(vec![mapping(SourceFamily::Chat, "chan-1")], history);
        let resolved = h.handle(query(Timestamp::from_unix_secs(1_700_000_000))).await;

        assert_eq!(resolved.contributing.len(), 1);
        assert!(!resolved.contributing[0].is_relevant);
        assert_eq!(resolved.warnings.len(), 1);
        assert_eq!(
            resolved.warnings[0].component,
            WarningComponent::SourceResolver
        );
    }

    #[tokio::test(start_paused = true)]
    async fn slow_source_times_out_and_degrades() {
        let history = MockHistoryStore {
            delay: Some(Duration::from_secs(30)),
            ..Default::default()
        };
        let h = ResolveSourcesHandler::new(
            Arc::new(MockMappingStore {
                mappings: vec![mapping(SourceFamily::TrackerHistory, "proj-1")],
                should_fail: false,
            }),
            Arc::new(history),
            WindowPolicy::default(),
            Duration::from_secs(10),
        );
        let resolved = h.handle(query(Timestamp::from_unix_secs(1_700_000_000))).await;

        assert!(!resolved.contributing[0].is_relevant);
        assert!(resolved.warnings[0].message.contains("timed out"));
    }

    #[tokio::test]
    async fn mapping_store_failure_skips_family_with_warning() {
        let h = ResolveSourcesHandler::new(
            Arc::new(MockMappingStore {
                mappings: vec![],
                should_fail: true,
            }),
            Arc::new(MockHistoryStore::default()),
            WindowPolicy::default(),
            Duration::from_secs(5),
        );
        let resolved = h.handle(query(Timestamp::from_unix_secs(1_700_000_000))).await;

        // Unknown mapping state: the family is skipped, not reported absent.
        assert!(resolved.contributing.is_empty());
        assert_eq!(resolved.warnings.len(), SourceFamily::WINDOWED.len());
    }

    #[tokio::test]
    async fn multiple_mappings_of_one_family_pool_their_items() {
        let center = Timestamp::from_unix_secs(1_700_000_000);
        let mut history = MockHistoryStore::default();
        history
            .items
            .insert("chan-1".to_string(), vec![item(center, "a")]);
        history
            .items
            .insert("chan-2".to_string(), vec![item(center.plus_hours(1), "b")]);

        let h = handler(
            vec![
                mapping(SourceFamily::Chat, "chan-1"),
                mapping(SourceFamily::Chat, "chan-2"),
            ],
            history,
        );
        let resolved = h.handle(query(center)).await;

        assert_eq!(resolved.contributing.len(), 1);
        assert_eq!(resolved.contributing[0].item_count, 2);
        assert_eq!(
            resolved.contributing[0].metadata["mapped_sources"],
            serde_json::json!(2)
        );
    }
}
