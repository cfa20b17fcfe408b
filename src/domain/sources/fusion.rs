//! Cross-source confidence fusion.
//!
//! Corroboration across independent channels should increase trust, but with
//! diminishing, capped returns, so many weak homogeneous sources cannot
//! produce runaway confidence.

use std::collections::HashSet;

use crate::domain::foundation::SourceConfidence;
use crate::domain::sources::ContributingSource;

/// Bonus per distinct source family beyond the first.
pub const DIVERSITY_BONUS_STEP: f64 = 0.05;

/// Ceiling on the total diversity bonus.
pub const DIVERSITY_BONUS_CAP: f64 = 0.15;

/// Fuses contributing sources into one aggregate confidence.
pub struct ConfidenceFusion;

impl ConfidenceFusion {
    /// Combines the resolved sources' confidences into one score.
    ///
    /// # Edge Cases
    /// - Empty slice: Returns 1.0 - the caller treats the primary source as
    ///   sole evidence.
    /// - Single source: Returns its confidence unchanged (no fusion needed).
    pub fn fuse(sources: &[ContributingSource]) -> SourceConfidence {
        match sources {
            [] => SourceConfidence::FULL,
            [only] => only.confidence,
            many => {
                let base = many.iter().map(|s| s.confidence.value()).sum::<f64>()
                    / many.len() as f64;
                let bonus = Self::diversity_bonus(many);
                SourceConfidence::new((base + bonus).min(1.0))
            }
        }
    }

    /// Capped bonus for corroboration across distinct source families.
    ///
    /// Sources from the same family corroborate nothing: N sources of one
    /// family yield a bonus of 0.
    pub fn diversity_bonus(sources: &[ContributingSource]) -> f64 {
        let families: HashSet<_> = sources.iter().map(|s| s.source_kind).collect();
        let distinct = families.len().saturating_sub(1) as f64;
        (distinct * DIVERSITY_BONUS_STEP).min(DIVERSITY_BONUS_CAP)
    }
}
