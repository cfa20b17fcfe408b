//! Anti-pattern catalog types.
//!
//! The catalog is supplied externally and read-only within this core: the
//! engine consumes pattern identifiers with their marker keywords, it does
//! not define the taxonomy itself.

use serde::{Deserialize, Serialize};

use crate::domain::sources::SourceFamily;

/// Severity assigned to a catalog pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Returns the display label for this severity.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// Ceremony types a catalog pattern applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CeremonyType {
    Standup,
    Planning,
    Retrospective,
    Review,
    Refinement,
}

/// One externally supplied anti-pattern definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternCatalogEntry {
    /// Stable pattern identifier, e.g. "silent-standup".
    pub pattern_id: String,
    /// Taxonomy category, e.g. "communication".
    pub category: String,
    /// Keyword markers matched case-insensitively against source text.
    pub markers: Vec<String>,
    /// Severity when detected.
    pub severity: Severity,
    /// Relative weight used when ranking recommendations.
    pub priority_weight: f64,
    /// Ceremony types this pattern applies to; empty means all.
    pub applicable_ceremony_types: Vec<CeremonyType>,
    /// Recommended remediation actions.
    pub recommended_actions: Vec<String>,
}

impl PatternCatalogEntry {
    /// Whether this entry applies to the given ceremony type.
    ///
    /// An empty applicability list means the pattern is universal.
    pub fn applies_to(&self, ceremony: CeremonyType) -> bool {
        self.applicable_ceremony_types.is_empty()
            || self.applicable_ceremony_types.contains(&ceremony)
    }
}

/// Filter passed to the catalog store when listing active patterns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFilter {
    /// Restrict to patterns relevant to these source families; empty = all.
    pub source_kinds: Vec<SourceFamily>,
    /// Restrict to patterns applicable to these ceremonies; empty = all.
    pub ceremony_types: Vec<CeremonyType>,
}

impl CatalogFilter {
    /// A filter that matches every active pattern.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts the filter to one ceremony type.
    pub fn for_ceremony(ceremony: CeremonyType) -> Self {
        Self {
            source_kinds: Vec::new(),
            ceremony_types: vec![ceremony],
        }
    }
}
