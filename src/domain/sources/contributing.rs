//! Contributing source value object.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::foundation::SourceConfidence;
use crate::domain::sources::SourceFamily;

/// One auxiliary source judged for relevance to an analysis event.
///
/// Computed fresh on every reconciliation call; never cached or persisted
/// independently - it is embedded in the fused result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributingSource {
    /// The source family this contribution came from.
    pub source_kind: SourceFamily,
    /// Raw per-source confidence in [0, 1].
    pub confidence: SourceConfidence,
    /// Whether any relevant activity fell inside the window.
    pub is_relevant: bool,
    /// Number of items matched inside the relevance window.
    pub item_count: usize,
    /// Opaque per-source metadata (counts, channel names, etc.).
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ContributingSource {
    /// A relevant contribution with the computed confidence.
    pub fn relevant(
        source_kind: SourceFamily,
        confidence: SourceConfidence,
        item_count: usize,
    ) -> Self {
        Self {
            source_kind,
            confidence,
            is_relevant: true,
            item_count,
            metadata: HashMap::new(),
        }
    }

    /// An absent contribution: the source is mapped but produced nothing
    /// inside its window. Absence is a signal, not a gap, so the source is
    /// emitted with zero confidence rather than omitted.
    pub fn absent(source_kind: SourceFamily) -> Self {
        Self {
            source_kind,
            confidence: SourceConfidence::ZERO,
            is_relevant: false,
            item_count: 0,
            metadata: HashMap::new(),
        }
    }

    /// Attaches a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}
