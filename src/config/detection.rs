//! Detection threshold configuration
//!
//! The thresholds and band formulas here are empirically chosen constants
//! preserved for behavioral compatibility. They are exposed as tunable
//! parameters rather than hard-coded literals, and are not re-derived.

use serde::Deserialize;

use crate::domain::detection::MatcherPolicy;
use crate::domain::foundation::CANONICAL_FLOOR;
use crate::domain::signals::DetectorPolicy;
use crate::domain::workspace_mode::ModeBandPolicy;

use super::error::ValidationError;

/// Detection and signal threshold configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetectionConfig {
    /// Stratified matcher parameters
    #[serde(default)]
    pub matcher: MatcherPolicy,

    /// Statistical/temporal detector parameters
    #[serde(default)]
    pub detector: DetectorPolicy,

    /// Workspace-mode band thresholds
    #[serde(default)]
    pub mode_bands: ModeBandPolicy,
}

impl DetectionConfig {
    /// Validate detection configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.matcher.detection_ceiling == 0 {
            return Err(ValidationError::InvalidDetectionCeiling);
        }
        if self.matcher.inference_cap >= CANONICAL_FLOOR as f64 {
            return Err(ValidationError::InferenceCapTooHigh);
        }
        if self.detector.z_threshold <= 0.0 {
            return Err(ValidationError::InvalidZThreshold);
        }
        if self.detector.min_history == 0 {
            return Err(ValidationError::InvalidMinHistory);
        }
        if self.mode_bands.grey_zone_floor <= 0.0
            || self.mode_bands.grey_zone_floor >= self.mode_bands.auto_apply_floor
        {
            return Err(ValidationError::InvalidModeBands);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_preserve_established_constants() {
        let config = DetectionConfig::default();
        assert_eq!(config.matcher.detection_ceiling, 20);
        assert_eq!(config.matcher.inference_cap, 79.0);
        assert_eq!(config.detector.z_threshold, 2.5);
        assert_eq!(config.detector.drift_delta_threshold, 15.0);
        assert_eq!(config.detector.min_history, 3);
        assert_eq!(config.mode_bands.auto_apply_floor, 0.70);
        assert_eq!(config.mode_bands.grey_zone_floor, 0.50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn inference_cap_may_not_reach_canonical() {
        let mut config = DetectionConfig::default();
        config.matcher.inference_cap = 80.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_mode_bands_fail_validation() {
        let mut config = DetectionConfig::default();
        config.mode_bands.grey_zone_floor = 0.80;
        assert!(config.validate().is_err());
    }
}
