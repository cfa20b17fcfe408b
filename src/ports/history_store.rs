//! HistoryStore port for fetching recent items from a mapped source.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::detection::PatternHint;
use crate::domain::foundation::{DomainError, Timestamp};

use super::source_mapping_store::SourceMapping;

/// One raw item fetched from an auxiliary source.
///
/// Raw text never crosses into persistence-facing ports; it exists only to
/// feed windowing and matching, and is reduced to derived types
/// (detections, excerpts) before anything is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawItem {
    pub occurred_at: Timestamp,
    pub text: String,
    /// Explicit pattern hint attached upstream, trusted by the matcher.
    pub hint: Option<PatternHint>,
}

/// Fetches recent activity for one mapped source.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Returns items for the mapping within `[start, end]`.
    ///
    /// Fails with `SourceUnavailable` when the integration is unreachable;
    /// the caller degrades that source to zero confidence and continues.
    async fn recent_items(
        &self,
        mapping: &SourceMapping,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<RawItem>, DomainError>;
}
