//! Stratified pattern matcher.
//!
//! Marker-based inference is capped below the canonical stratum: canonical
//! detections (score >= 80) are only produced by the explicit-hint path or
//! by the classification collaborator reporting its own confidence >= 80.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::catalog::{CeremonyType, PatternCatalogEntry};
use crate::domain::detection::evidence::{EvidenceRule, WeightedEvidence};
use crate::domain::detection::{DetectionStatus, PatternDetection, TextUnit};
use crate::domain::foundation::{AnalysisId, DetectionId, DetectionScore};

/// Tunable matcher parameters.
///
/// Defaults preserve the empirically chosen constants; they are carried
/// through configuration rather than re-derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherPolicy {
    /// Base score for any marker-inferred detection.
    pub inference_base: f64,
    /// Score added per matched marker.
    pub per_marker: f64,
    /// Ceiling for marker-inferred scores (kept below canonical floor).
    pub inference_cap: f64,
    /// Maximum detections emitted per analysis event.
    pub detection_ceiling: usize,
}

impl Default for MatcherPolicy {
    fn default() -> Self {
        Self {
            inference_base: 40.0,
            per_marker: 15.0,
            inference_cap: 79.0,
            detection_ceiling: 20,
        }
    }
}

/// Context evaluated by the marker-inference evidence table.
struct InferenceContext {
    match_count: usize,
    per_marker: f64,
}

/// Single-rule evidence table for marker inference; shares the uniform
/// table evaluation with the workspace-mode scorer.
const INFERENCE_RULES: &[EvidenceRule<InferenceContext>] = &[EvidenceRule {
    name: "marker_matches",
    weight: |c| c.per_marker * c.match_count as f64,
}];

/// Runs keyword/marker matching against active catalog entries.
pub struct StratifiedMatcher;

impl StratifiedMatcher {
    /// Returns the markers of `entry` found in `text` (case-insensitive
    /// substring match).
    pub fn marker_matches(text: &str, entry: &PatternCatalogEntry) -> Vec<String> {
        let lowered = text.to_lowercase();
        entry
            .markers
            .iter()
            .filter(|marker| lowered.contains(&marker.to_lowercase()))
            .cloned()
            .collect()
    }

    /// Matches one text unit against the catalog, producing raw detections.
    ///
    /// The explicit-hint path trusts the upstream-supplied score directly
    /// and skips keyword inference for that pattern. All other patterns go
    /// through capped marker inference.
    pub fn match_unit(
        analysis_id: AnalysisId,
        unit: &TextUnit,
        catalog: &[PatternCatalogEntry],
        ceremony: Option<CeremonyType>,
        policy: &MatcherPolicy,
    ) -> Vec<PatternDetection> {
        let mut detections = Vec::new();

        for entry in catalog {
            if let Some(ceremony) = ceremony {
                if !entry.applies_to(ceremony) {
                    continue;
                }
            }

            let matched = Self::marker_matches(&unit.text, entry);

            if let Some(hint) = unit.hint.as_ref().filter(|h| h.pattern_id == entry.pattern_id) {
                if hint.score.is_storable() {
                    detections.push(Self::build(analysis_id, unit, entry, hint.score, matched));
                }
                continue;
            }

            if matched.is_empty() {
                continue;
            }

            let evidence = WeightedEvidence::evaluate(
                INFERENCE_RULES,
                &InferenceContext {
                    match_count: matched.len(),
                    per_marker: policy.per_marker,
                },
            );
            let score = DetectionScore::from_f64(
                (policy.inference_base + evidence.total()).min(policy.inference_cap),
            );
            if !score.is_storable() {
                continue;
            }
            detections.push(Self::build(analysis_id, unit, entry, score, matched));
        }

        detections
    }

    /// Builds a detection from a classifier opinion, if it clears the
    /// storable floor. The classifier's self-reported confidence is the one
    /// path (besides hints) that can reach the canonical stratum.
    pub fn from_classifier(
        analysis_id: AnalysisId,
        unit: &TextUnit,
        entry: &PatternCatalogEntry,
        reported_score: DetectionScore,
    ) -> Option<PatternDetection> {
        if !reported_score.is_storable() {
            return None;
        }
        let matched = Self::marker_matches(&unit.text, entry);
        Some(Self::build(analysis_id, unit, entry, reported_score, matched))
    }

    /// Drops scores below the storable floor, deduplicates by pattern id
    /// (highest score wins), and enforces the per-event ceiling, truncating
    /// lowest-score entries first.
    pub fn finalize(
        mut detections: Vec<PatternDetection>,
        policy: &MatcherPolicy,
    ) -> Vec<PatternDetection> {
        // Nothing below the storable floor may reach the report or store.
        detections.retain(|d| d.score.is_storable());

        // Highest score first so dedup keeps the winner.
        detections.sort_by(|a, b| b.score.cmp(&a.score));

        let mut seen = std::collections::HashSet::new();
        detections.retain(|d| seen.insert(d.pattern_id.clone()));

        if detections.len() > policy.detection_ceiling {
            debug!(
                dropped = detections.len() - policy.detection_ceiling,
                "Detection ceiling reached, truncating lowest-score entries"
            );
            detections.truncate(policy.detection_ceiling);
        }

        detections
    }

    fn build(
        analysis_id: AnalysisId,
        unit: &TextUnit,
        entry: &PatternCatalogEntry,
        score: DetectionScore,
        detected_markers: Vec<String>,
    ) -> PatternDetection {
        PatternDetection {
            detection_id: DetectionId::new(),
            analysis_id,
            pattern_id: entry.pattern_id.clone(),
            category: entry.category.clone(),
            score,
            detected_markers,
            severity: entry.severity,
            context_excerpt: unit.excerpt(),
            recommended_actions: entry.recommended_actions.clone(),
            status: DetectionStatus::Detected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::Severity;
    use crate::domain::detection::PatternHint;
    use crate::domain::foundation::DetectionTier;
    use crate::domain::sources::SourceFamily;

    fn entry(pattern_id: &str, markers: &[&str]) -> PatternCatalogEntry {
        PatternCatalogEntry {
            pattern_id: pattern_id.to_string(),
            category: "flow".to_string(),
            markers: markers.iter().map(|m| m.to_string()).collect(),
            severity: Severity::Medium,
            priority_weight: 1.0,
            applicable_ceremony_types: vec![],
            recommended_actions: vec!["Split the work".to_string()],
        }
    }

    fn policy() -> MatcherPolicy {
        MatcherPolicy::default()
    }

    #[test]
    fn marker_matching_is_case_insensitive() {
        let e = entry("blocked-flow", &["Blocked On", "waiting for"]);
        let matched = StratifiedMatcher::marker_matches("still BLOCKED on the review", &e);
        assert_eq!(matched, vec!["Blocked On".to_string()]);
    }

    #[test]
    fn single_marker_match_scores_fifty_five() {
        let unit = TextUnit::new(SourceFamily::Chat, "we are blocked on infra");
        let catalog = vec![entry("blocked-flow", &["blocked on"])];

        let detections =
            StratifiedMatcher::match_unit(AnalysisId::new(), &unit, &catalog, None, &policy());
        assert_eq!(detections.len(), 1);
        // 40 + 15 * 1
        assert_eq!(detections[0].score.value(), 55);
        assert_eq!(detections[0].tier(), Some(DetectionTier::Emerging));
    }

    #[test]
    fn inference_caps_below_canonical() {
        let unit = TextUnit::new(
            SourceFamily::Chat,
            "blocked on infra, waiting for review, stuck again, no progress",
        );
        let catalog = vec![entry(
            "blocked-flow",
            &["blocked on", "waiting for", "stuck", "no progress"],
        )];

        let detections =
            StratifiedMatcher::match_unit(AnalysisId::new(), &unit, &catalog, None, &policy());
        // 40 + 15 * 4 = 100, capped at 79
        assert_eq!(detections[0].score.value(), 79);
        assert_eq!(detections[0].tier(), Some(DetectionTier::WeakSignal));
    }

    #[test]
    fn explicit_hint_is_trusted_and_skips_inference() {
        let unit = TextUnit::new(SourceFamily::Chat, "nothing matching here")
            .with_hint(PatternHint {
                pattern_id: "blocked-flow".to_string(),
                score: DetectionScore::new(92),
            });
        let catalog = vec![entry("blocked-flow", &["blocked on"])];

        let detections =
            StratifiedMatcher::match_unit(AnalysisId::new(), &unit, &catalog, None, &policy());
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].score.value(), 92);
        assert_eq!(detections[0].tier(), Some(DetectionTier::Canonical));
    }

    #[test]
    fn hint_below_the_storable_floor_is_discarded() {
        let unit = TextUnit::new(SourceFamily::Chat, "all smooth today").with_hint(PatternHint {
            pattern_id: "blocked-flow".to_string(),
            score: DetectionScore::new(30),
        });
        let catalog = vec![entry("blocked-flow", &["blocked on"])];

        let detections =
            StratifiedMatcher::match_unit(AnalysisId::new(), &unit, &catalog, None, &policy());
        assert!(detections.is_empty());
    }

    #[test]
    fn finalize_filters_sub_floor_scores() {
        let unit = TextUnit::new(SourceFamily::Chat, "text");
        let e = entry("blocked-flow", &[]);
        let raw = vec![StratifiedMatcher::build(
            AnalysisId::new(),
            &unit,
            &e,
            DetectionScore::new(30),
            vec![],
        )];

        let finalized = StratifiedMatcher::finalize(raw, &policy());
        assert!(finalized.iter().all(|d| d.score.is_storable()));
        assert!(finalized.is_empty());
    }

    #[test]
    fn no_markers_and_no_hint_yields_nothing() {
        let unit = TextUnit::new(SourceFamily::Chat, "all smooth today");
        let catalog = vec![entry("blocked-flow", &["blocked on"])];

        let detections =
            StratifiedMatcher::match_unit(AnalysisId::new(), &unit, &catalog, None, &policy());
        assert!(detections.is_empty());
    }

    #[test]
    fn ceremony_filter_skips_inapplicable_entries() {
        let mut e = entry("standup-silence", &["no update"]);
        e.applicable_ceremony_types = vec![CeremonyType::Standup];
        let unit = TextUnit::new(SourceFamily::MeetingTranscript, "no update from half the team");

        let detections = StratifiedMatcher::match_unit(
            AnalysisId::new(),
            &unit,
            &[e.clone()],
            Some(CeremonyType::Retrospective),
            &policy(),
        );
        assert!(detections.is_empty());

        let detections = StratifiedMatcher::match_unit(
            AnalysisId::new(),
            &unit,
            &[e],
            Some(CeremonyType::Standup),
            &policy(),
        );
        assert_eq!(detections.len(), 1);
    }

    #[test]
    fn classifier_opinion_below_floor_is_discarded() {
        let unit = TextUnit::new(SourceFamily::Chat, "ambiguous text");
        let e = entry("blocked-flow", &["blocked on"]);
        assert!(StratifiedMatcher::from_classifier(
            AnalysisId::new(),
            &unit,
            &e,
            DetectionScore::new(35)
        )
        .is_none());
        assert!(StratifiedMatcher::from_classifier(
            AnalysisId::new(),
            &unit,
            &e,
            DetectionScore::new(84)
        )
        .is_some());
    }

    #[test]
    fn finalize_dedupes_by_pattern_keeping_highest() {
        let analysis_id = AnalysisId::new();
        let e = entry("blocked-flow", &["blocked on"]);
        let unit_low = TextUnit::new(SourceFamily::Chat, "blocked on x");
        let unit_high = TextUnit::new(SourceFamily::MeetingTranscript, "blocked on x")
            .with_hint(PatternHint {
                pattern_id: "blocked-flow".to_string(),
                score: DetectionScore::new(90),
            });

        let mut all =
            StratifiedMatcher::match_unit(analysis_id, &unit_low, &[e.clone()], None, &policy());
        all.extend(StratifiedMatcher::match_unit(
            analysis_id,
            &unit_high,
            &[e],
            None,
            &policy(),
        ));

        let finalized = StratifiedMatcher::finalize(all, &policy());
        assert_eq!(finalized.len(), 1);
        assert_eq!(finalized[0].score.value(), 90);
    }

    #[test]
    fn finalize_truncates_lowest_scores_first() {
        let analysis_id = AnalysisId::new();
        let unit = TextUnit::new(SourceFamily::Chat, "text");
        let mut detections = Vec::new();
        for i in 0..25u8 {
            let e = entry(&format!("pattern-{i}"), &[]);
            detections.push(
                StratifiedMatcher::from_classifier(
                    analysis_id,
                    &unit,
                    &e,
                    DetectionScore::new(40 + i * 2),
                )
                .unwrap(),
            );
        }

        let finalized = StratifiedMatcher::finalize(detections, &policy());
        assert_eq!(finalized.len(), 20);
        // The five lowest scores (40, 42, 44, 46, 48) were dropped.
        assert!(finalized.iter().all(|d| d.score.value() >= 50));
    }
}
