//! Pattern detection types.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::Severity;
use crate::domain::foundation::{AnalysisId, DetectionId, DetectionScore, DetectionTier};
use crate::domain::sources::SourceFamily;

/// Maximum characters kept in a detection's context excerpt.
///
/// Raw text never reaches persistence-facing types; only this bounded
/// derived excerpt is stored.
pub const EXCERPT_MAX_CHARS: usize = 160;

/// Lifecycle status of a detection.
///
/// Transitions beyond `Detected` are owned by the downstream workflow
/// collaborator, not this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStatus {
    Detected,
    Acknowledged,
    Resolved,
}

/// One detected anti-pattern for one analysis event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternDetection {
    pub detection_id: DetectionId,
    pub analysis_id: AnalysisId,
    pub pattern_id: String,
    pub category: String,
    /// Confidence score; the stratum is derived from it, never set directly.
    pub score: DetectionScore,
    pub detected_markers: Vec<String>,
    pub severity: Severity,
    pub context_excerpt: String,
    pub recommended_actions: Vec<String>,
    pub status: DetectionStatus,
}

impl PatternDetection {
    /// The stratum this detection falls into, derived from its score.
    pub fn tier(&self) -> Option<DetectionTier> {
        self.score.tier()
    }
}

/// An explicit pattern hint attached to an input item by a human or
/// upstream producer. Trusted directly; keyword inference is skipped for
/// the hinted pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternHint {
    pub pattern_id: String,
    pub score: DetectionScore,
}

/// One candidate text unit fed to the matcher: the primary content or one
/// contributing source's material.
#[derive(Debug, Clone)]
pub struct TextUnit {
    pub source_kind: SourceFamily,
    pub text: String,
    pub hint: Option<PatternHint>,
}

impl TextUnit {
    pub fn new(source_kind: SourceFamily, text: impl Into<String>) -> Self {
        Self {
            source_kind,
            text: text.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: PatternHint) -> Self {
        self.hint = Some(hint);
        self
    }

    /// Bounded excerpt of this unit's text, safe to embed in a detection.
    pub fn excerpt(&self) -> String {
        if self.text.chars().count() <= EXCERPT_MAX_CHARS {
            return self.text.clone();
        }
        let truncated: String = self.text.chars().take(EXCERPT_MAX_CHARS).collect();
        format!("{}...", truncated.trim_end())
    }
}
