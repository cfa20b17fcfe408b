//! Stratified pattern matching and weighted evidence.

mod detection;
mod evidence;
mod matcher;

pub use detection::{
    DetectionStatus, PatternDetection, PatternHint, TextUnit, EXCERPT_MAX_CHARS,
};
pub use evidence::{EvidenceContribution, EvidenceRule, WeightedEvidence};
pub use matcher::{MatcherPolicy, StratifiedMatcher};
