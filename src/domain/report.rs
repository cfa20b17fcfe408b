//! Reconciliation report - the structured document returned to the caller.

use serde::{Deserialize, Serialize};

use crate::domain::detection::PatternDetection;
use crate::domain::event::AnalysisEvent;
use crate::domain::foundation::{AnalysisId, SourceConfidence};
use crate::domain::signals::{EmergingTrend, WeakSignal};
use crate::domain::sources::ContributingSource;
use crate::domain::workspace_mode::ModeRecommendation;

/// Merged blocker/risk counts across the primary event and contributing
/// sources' metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedCounts {
    pub blockers: u32,
    pub risks: u32,
}

impl MergedCounts {
    /// Merges the primary event's counts with any counts the contributing
    /// sources carried in their metadata (`blocker_count` / `risk_count`).
    pub fn merge(event: &AnalysisEvent, sources: &[ContributingSource]) -> Self {
        let metadata_count = |source: &ContributingSource, key: &str| -> u32 {
            source
                .metadata
                .get(key)
                .and_then(|v| v.as_u64())
                .unwrap_or(0) as u32
        };

        let mut counts = Self {
            blockers: event.blocker_count,
            risks: event.risk_count,
        };
        for source in sources {
            counts.blockers += metadata_count(source, "blocker_count");
            counts.risks += metadata_count(source, "risk_count");
        }
        counts
    }
}

/// The pipeline component a warning originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningComponent {
    SourceResolver,
    Catalog,
    Classifier,
    History,
    DetectionStore,
    SignalStore,
    TrendStore,
}

/// A reported partial failure. Degraded behavior is surfaced here rather
/// than silently swallowed, so callers and tests can assert on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warning {
    pub component: WarningComponent,
    pub message: String,
}

impl Warning {
    pub fn new(component: WarningComponent, message: impl Into<String>) -> Self {
        Self {
            component,
            message: message.into(),
        }
    }
}

/// Output of one reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub analysis_id: AnalysisId,
    pub contributing_sources: Vec<ContributingSource>,
    pub merged_counts: MergedCounts,
    pub cross_source_confidence: SourceConfidence,
    pub pattern_detections: Vec<PatternDetection>,
    pub weak_signals: Vec<WeakSignal>,
    pub emerging_trends: Vec<EmergingTrend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode_recommendation: Option<ModeRecommendation>,
    pub warnings: Vec<Warning>,
}

impl ReconciliationReport {
    /// Whether any component reported degraded behavior.
    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Warnings originating from one component.
    pub fn warnings_from(&self, component: WarningComponent) -> Vec<&Warning> {
        self.warnings
            .iter()
            .filter(|w| w.component == component)
            .collect()
    }
}
