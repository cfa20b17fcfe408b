//! Engine configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `SIGNAL_STRATA` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use signal_strata::config::EngineConfig;
//!
//! let config = EngineConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod detection;
mod error;
mod features;
mod sources;

pub use detection::DetectionConfig;
pub use error::{ConfigError, ValidationError};
pub use features::FeatureFlags;
pub use sources::SourcesConfig;

use serde::Deserialize;

/// Root engine configuration
///
/// Every empirically chosen threshold in the detectors is surfaced here as
/// a tunable parameter; the defaults reproduce the established behavior.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    /// Source window resolution (relevance windows, timeouts, concurrency)
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Detection thresholds (matcher, statistical detectors, mode bands)
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Feature flags
    #[serde(default)]
    pub features: FeatureFlags,
}

impl EngineConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `SIGNAL_STRATA` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `SIGNAL_STRATA__SOURCES__SOURCE_TIMEOUT_SECS=5`
    /// - `SIGNAL_STRATA__DETECTION__DETECTOR__Z_THRESHOLD=3.0`
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SIGNAL_STRATA")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.sources.validate()?;
        self.detection.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_config_carries_established_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.detection.detector.z_threshold, 2.5);
        assert_eq!(config.detection.matcher.detection_ceiling, 20);
        assert_eq!(config.sources.windows.chat_half_window_hours, 6);
        assert!(!config.features.allow_confirmed_override);
    }
}
