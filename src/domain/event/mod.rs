//! Analysis event record.
//!
//! An [`AnalysisEvent`] is created by an upstream producer and is read-only
//! within this core: it is never mutated, only superseded by newer events.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ActorId, AnalysisId, Timestamp, WorkspaceId};
use crate::domain::sources::SourceFamily;

/// Immutable record of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisEvent {
    /// Unique identifier of this analysis run.
    pub analysis_id: AnalysisId,
    /// Workspace the analysis belongs to.
    pub workspace_id: WorkspaceId,
    /// Actor (team or person) the analysis history is keyed by.
    pub actor: ActorId,
    /// Source family the primary content came from.
    pub primary_source: SourceFamily,
    /// When the analyzed activity occurred.
    pub occurred_at: Timestamp,
    /// Free-text preview of the analyzed content.
    pub content_preview: String,
    /// Number of blockers detected in this run.
    pub blocker_count: u32,
    /// Number of risks detected in this run.
    pub risk_count: u32,
    /// Recorded blocker descriptions, used for recurrence grouping.
    pub blocker_descriptions: Vec<String>,
    /// Arbitrary nested analysis payload from the producer.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl AnalysisEvent {
    /// Creates a minimal event; callers fill optional detail via struct update.
    pub fn new(
        workspace_id: WorkspaceId,
        actor: ActorId,
        primary_source: SourceFamily,
        occurred_at: Timestamp,
        content_preview: impl Into<String>,
    ) -> Self {
        Self {
            analysis_id: AnalysisId::new(),
            workspace_id,
            actor,
            primary_source,
            occurred_at,
            content_preview: content_preview.into(),
            blocker_count: 0,
            risk_count: 0,
            blocker_descriptions: Vec::new(),
            payload: serde_json::Value::Null,
        }
    }
}
