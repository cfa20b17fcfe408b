//! Confidence value objects.
//!
//! Two distinct scales exist in this domain and must not be confused:
//! per-source and fused confidences live on the unit interval [0, 1], while
//! detection/signal/trend scores live on a 0-100 scale partitioned into
//! three strata.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A confidence on the unit interval [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceConfidence(f64);

impl SourceConfidence {
    /// Zero confidence.
    pub const ZERO: Self = Self(0.0);

    /// Full confidence.
    pub const FULL: Self = Self(1.0);

    /// Creates a new SourceConfidence, clamping to [0, 1].
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    /// Creates a SourceConfidence, returning error if out of range.
    pub fn try_new(value: f64) -> Result<Self, ValidationError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::out_of_range("confidence", 0.0, 1.0, value));
        }
        Ok(Self(value))
    }

    /// Returns the value as f64.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for SourceConfidence {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for SourceConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Lower bound of the canonical stratum.
pub const CANONICAL_FLOOR: u8 = 80;

/// Lower bound of the weak-signal stratum.
pub const WEAK_SIGNAL_FLOOR: u8 = 60;

/// Lower bound of the emerging stratum; scores below this are discarded.
pub const EMERGING_FLOOR: u8 = 40;

/// The three confidence strata, in decreasing certainty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionTier {
    /// Score >= 80: actionable with operational confidence.
    Canonical,
    /// Score 60-79: worth surfacing, pending corroboration.
    WeakSignal,
    /// Score 40-59: exploratory, monitor only.
    Emerging,
}

impl DetectionTier {
    /// Returns the display label for this tier.
    pub fn label(&self) -> &'static str {
        match self {
            DetectionTier::Canonical => "canonical",
            DetectionTier::WeakSignal => "weak_signal",
            DetectionTier::Emerging => "emerging",
        }
    }
}

/// A detection confidence score on the 0-100 scale.
///
/// The stratum is derived from the score and never stored independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectionScore(u8);

impl DetectionScore {
    /// Creates a new DetectionScore, clamping to [0, 100].
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    /// Creates a DetectionScore from a float, rounding and clamping.
    pub fn from_f64(value: f64) -> Self {
        Self(value.round().clamp(0.0, 100.0) as u8)
    }

    /// Creates a DetectionScore, returning error if over 100.
    pub fn try_new(value: u8) -> Result<Self, ValidationError> {
        if value > 100 {
            return Err(ValidationError::out_of_range(
                "score",
                0.0,
                100.0,
                value as f64,
            ));
        }
        Ok(Self(value))
    }

    /// Returns the value as u8.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Returns the stratum this score falls into, or None below the
    /// emerging floor (such scores are discarded, never stored).
    pub fn tier(&self) -> Option<DetectionTier> {
        match self.0 {
            v if v >= CANONICAL_FLOOR => Some(DetectionTier::Canonical),
            v if v >= WEAK_SIGNAL_FLOOR => Some(DetectionTier::WeakSignal),
            v if v >= EMERGING_FLOOR => Some(DetectionTier::Emerging),
            _ => None,
        }
    }

    /// Whether this score clears the emerging floor and may be stored.
    pub fn is_storable(&self) -> bool {
        self.0 >= EMERGING_FLOOR
    }
}

impl fmt::Display for DetectionScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn source_confidence_new_clamps() {
        assert_eq!(SourceConfidence::new(-0.5).value(), 0.0);
        assert_eq!(SourceConfidence::new(0.75).value(), 0.75);
        assert_eq!(SourceConfidence::new(1.5).value(), 1.0);
    }

    #[test]
    fn source_confidence_try_new_rejects_out_of_range() {
        assert!(SourceConfidence::try_new(1.01).is_err());
        assert!(SourceConfidence::try_new(-0.01).is_err());
        assert!(SourceConfidence::try_new(0.0).is_ok());
        assert!(SourceConfidence::try_new(1.0).is_ok());
    }

    #[test]
    fn detection_score_new_clamps_to_100() {
        assert_eq!(DetectionScore::new(101).value(), 100);
        assert_eq!(DetectionScore::new(255).value(), 100);
    }

    #[test]
    fn detection_score_from_f64_rounds() {
        assert_eq!(DetectionScore::from_f64(79.4).value(), 79);
        assert_eq!(DetectionScore::from_f64(79.5).value(), 80);
        assert_eq!(DetectionScore::from_f64(-3.0).value(), 0);
        assert_eq!(DetectionScore::from_f64(250.0).value(), 100);
    }

    #[test]
    fn tier_boundaries_are_exact() {
        assert_eq!(DetectionScore::new(100).tier(), Some(DetectionTier::Canonical));
        assert_eq!(DetectionScore::new(80).tier(), Some(DetectionTier::Canonical));
        assert_eq!(DetectionScore::new(79).tier(), Some(DetectionTier::WeakSignal));
        assert_eq!(DetectionScore::new(60).tier(), Some(DetectionTier::WeakSignal));
        assert_eq!(DetectionScore::new(59).tier(), Some(DetectionTier::Emerging));
        assert_eq!(DetectionScore::new(40).tier(), Some(DetectionTier::Emerging));
        assert_eq!(DetectionScore::new(39).tier(), None);
        assert_eq!(DetectionScore::new(0).tier(), None);
    }

    #[test]
    fn storable_iff_at_least_emerging_floor() {
        assert!(DetectionScore::new(40).is_storable());
        assert!(!DetectionScore::new(39).is_storable());
    }

    proptest! {
        #[test]
        fn tier_matches_score_band(score in 0u8..=100) {
            let tier = DetectionScore::new(score).tier();
            match score {
                80..=100 => prop_assert_eq!(tier, Some(DetectionTier::Canonical)),
                60..=79 => prop_assert_eq!(tier, Some(DetectionTier::WeakSignal)),
                40..=59 => prop_assert_eq!(tier, Some(DetectionTier::Emerging)),
                _ => prop_assert_eq!(tier, None),
            }
        }
    }
}
