//! Multi-workspace-mode scorer.
//!
//! A weighted-evidence accumulator over four independent signals, evaluated
//! through the same declarative table the stratified matcher uses. The total
//! score is not normalized (ceiling 1.33); decision bands carry a grey zone
//! where automated action is suppressed pending human confirmation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::domain::detection::{EvidenceRule, WeightedEvidence};
use crate::domain::workspace_mode::{ModeBand, ModeSettings, ProjectMode, WorkspaceMode};

/// Band thresholds; tunable through configuration, defaults preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeBandPolicy {
    /// At or above: confident multi-project, auto-apply.
    pub auto_apply_floor: f64,
    /// At or above (and below `auto_apply_floor`): grey zone.
    pub grey_zone_floor: f64,
    /// Whether re-detection may override a human-confirmed mode.
    pub allow_confirmed_override: bool,
}

impl Default for ModeBandPolicy {
    fn default() -> Self {
        Self {
            auto_apply_floor: 0.70,
            grey_zone_floor: 0.50,
            allow_confirmed_override: false,
        }
    }
}

/// Raw observations the scorer weighs.
#[derive(Debug, Clone, Default)]
pub struct ModeObservation {
    /// Distinct project names mentioned across recent content.
    pub distinct_project_mentions: usize,
    /// Raw text scanned for backlog/board references.
    pub scan_text: String,
    /// Count of blocking dependencies that cross workspace boundaries.
    pub cross_workspace_dependencies: usize,
    /// Concurrently active top-level goals.
    pub active_top_level_goals: usize,
    /// Recent iteration goals with misaligned or partial status.
    pub misaligned_recent_goals: usize,
}

/// Pre-extracted counts fed to the evidence table.
struct ModeSignals {
    project_mentions: usize,
    unique_backlog_refs: usize,
    cross_dependencies: usize,
    active_goals: usize,
    misaligned_goals: usize,
}

static BACKLOG_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:backlog|board|sprint board)\s+([A-Za-z0-9][A-Za-z0-9_-]*)")
        .expect("backlog reference regex is valid")
});

/// The four mode signals as a declarative evidence table. Each extractor
/// owns its tiering; weights are capped per signal.
const MODE_RULES: &[EvidenceRule<ModeSignals>] = &[
    EvidenceRule {
        name: "project_mentions",
        weight: |s| match s.project_mentions {
            n if n > 2 => 0.35,
            2 => 0.20,
            _ => 0.0,
        },
    },
    EvidenceRule {
        name: "backlog_references",
        weight: |s| match s.unique_backlog_refs {
            n if n > 2 => 0.40,
            2 => 0.25,
            _ => 0.0,
        },
    },
    EvidenceRule {
        name: "cross_workspace_dependencies",
        weight: |s| match s.cross_dependencies {
            n if n > 1 => 0.30,
            1 => 0.15,
            _ => 0.0,
        },
    },
    EvidenceRule {
        name: "goal_instability",
        // Count-based and status-based estimates compete; take the max,
        // not the sum.
        weight: |s| {
            let count_based: f64 = if s.active_goals > 1 { 0.28 } else { 0.0 };
            let status_based = if s.misaligned_goals >= 2 { 0.20 } else { 0.0 };
            count_based.max(status_based)
        },
    },
];

/// Outcome of one mode detection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeRecommendation {
    /// Mode the evidence points to.
    pub detected: ProjectMode,
    /// Band the score fell into.
    pub band: ModeBand,
    /// Total evidence score (ceiling 1.33, not normalized).
    pub score: f64,
    /// Per-signal contributions.
    pub evidence: WeightedEvidence,
    /// Mode actually in effect after applying the sticky-confirmation rule.
    pub applied_mode: WorkspaceMode,
    /// True when the band requires a human decision before applying.
    pub requires_confirmation: bool,
    /// Settings for the applied mode, returned explicitly with the decision.
    pub settings: ModeSettings,
}

/// Weighted-evidence scorer deciding single- vs multi-project treatment.
pub struct ModeScorer;

impl ModeScorer {
    /// Counts unique backlog/board references in the scan text.
    pub fn unique_backlog_refs(text: &str) -> usize {
        BACKLOG_REF
            .captures_iter(text)
            .map(|c| c[1].to_lowercase())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Evaluates the evidence table over an observation.
    pub fn score(observation: &ModeObservation) -> WeightedEvidence {
        let signals = ModeSignals {
            project_mentions: observation.distinct_project_mentions,
            unique_backlog_refs: Self::unique_backlog_refs(&observation.scan_text),
            cross_dependencies: observation.cross_workspace_dependencies,
            active_goals: observation.active_top_level_goals,
            misaligned_goals: observation.misaligned_recent_goals,
        };
        WeightedEvidence::evaluate(MODE_RULES, &signals)
    }

    /// Scores an observation and applies the sticky-confirmation rule
    /// against the stored mode.
    pub fn recommend(
        observation: &ModeObservation,
        stored: WorkspaceMode,
        policy: &ModeBandPolicy,
    ) -> ModeRecommendation {
        let evidence = Self::score(observation);
        let score = evidence.total();

        let band = if score >= policy.auto_apply_floor {
            ModeBand::ConfidentMulti
        } else if score >= policy.grey_zone_floor {
            ModeBand::GreyZone
        } else {
            ModeBand::Single
        };

        let detected = match band {
            ModeBand::Single => ProjectMode::SingleProject,
            _ => ProjectMode::MultiProject,
        };

        let applied_mode = match stored {
            WorkspaceMode::Confirmed(mode) if !policy.allow_confirmed_override => {
                // Confirmed wins: only confidence/metadata refresh.
                debug!(score, "Stored mode is confirmed, keeping it");
                WorkspaceMode::Confirmed(mode)
            }
            _ => match band {
                ModeBand::ConfidentMulti => WorkspaceMode::Confirmed(ProjectMode::MultiProject),
                // Grey zone and single band leave the stored setting alone
                // until a human decides.
                _ => stored,
            },
        };

        let effective = match applied_mode {
            WorkspaceMode::Confirmed(mode) => mode,
            WorkspaceMode::AutoDetect => detected,
        };

        ModeRecommendation {
            detected,
            band,
            score,
            evidence,
            applied_mode,
            requires_confirmation: band == ModeBand::GreyZone
                && !matches!(stored, WorkspaceMode::Confirmed(_)),
            settings: ModeSettings::for_mode(effective),
        }
    }
}
