//! Declarative weighted-evidence evaluation.
//!
//! Both the stratified matcher's inference scoring and the workspace-mode
//! scorer are weighted-evidence accumulators. They share this table form -
//! `(signal name, extractor) -> weight` evaluated uniformly - so the two
//! scorers cannot silently diverge.

use serde::{Deserialize, Serialize};

/// One evidence rule: a named signal with a weight extractor.
///
/// The extractor owns its own tiering (count thresholds, caps); the table
/// only evaluates and sums.
pub struct EvidenceRule<C> {
    pub name: &'static str,
    pub weight: fn(&C) -> f64,
}

/// One evaluated contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceContribution {
    pub signal: String,
    pub weight: f64,
}

/// Transient accumulator of evaluated evidence.
///
/// Computed and discarded per call; never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeightedEvidence {
    pub contributions: Vec<EvidenceContribution>,
}

impl WeightedEvidence {
    /// Evaluates every rule against the context.
    pub fn evaluate<C>(rules: &[EvidenceRule<C>], context: &C) -> Self {
        Self {
            contributions: rules
                .iter()
                .map(|rule| EvidenceContribution {
                    signal: rule.name.to_string(),
                    weight: (rule.weight)(context),
                })
                .collect(),
        }
    }

    /// Sum of all contribution weights.
    pub fn total(&self) -> f64 {
        self.contributions.iter().map(|c| c.weight).sum()
    }

    /// Weight contributed by a named signal, or 0 if absent.
    pub fn weight_of(&self, signal: &str) -> f64 {
        self.contributions
            .iter()
            .find(|c| c.signal == signal)
            .map(|c| c.weight)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counts {
        mentions: usize,
    }

    const RULES: &[EvidenceRule<Counts>] = &[
        EvidenceRule {
            name: "mentions",
            weight: |c| if c.mentions > 2 { 0.35 } else { 0.0 },
        },
        EvidenceRule {
            name: "constant",
            weight: |_| 0.10,
        },
    ];

    #[test]
    fn evaluate_applies_every_rule() {
        let evidence = WeightedEvidence::evaluate(RULES, &Counts { mentions: 3 });
        assert_eq!(evidence.contributions.len(), 2);
        assert!((evidence.total() - 0.45).abs() < 1e-9);
    }

    #[test]
    fn weight_of_returns_named_contribution() {
        let evidence = WeightedEvidence::evaluate(RULES, &Counts { mentions: 0 });
        assert_eq!(evidence.weight_of("mentions"), 0.0);
        assert!((evidence.weight_of("constant") - 0.10).abs() < 1e-9);
        assert_eq!(evidence.weight_of("unknown"), 0.0);
    }

    #[test]
    fn empty_table_totals_zero() {
        let rules: [EvidenceRule<Counts>; 0] = [];
        let evidence = WeightedEvidence::evaluate(&rules, &Counts { mentions: 9 });
        assert_eq!(evidence.total(), 0.0);
    }
}
