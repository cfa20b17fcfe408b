//! Source resolution configuration

use serde::Deserialize;
use std::time::Duration;

use crate::domain::sources::WindowPolicy;

use super::error::ValidationError;

/// Source window resolution configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    /// Per-family windowing policy and confidence formulas
    #[serde(default)]
    pub windows: WindowPolicy,

    /// Per-source fetch deadline in seconds; on timeout the source degrades
    /// to zero confidence instead of failing the reconciliation
    #[serde(default = "default_source_timeout")]
    pub source_timeout_secs: u64,

    /// Cap on concurrent classification calls (the collaborator's rate
    /// limit, guarded by a semaphore)
    #[serde(default = "default_classifier_concurrency")]
    pub classifier_concurrency: usize,
}

impl SourcesConfig {
    /// Get the per-source timeout as Duration
    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_secs)
    }

    /// Validate source configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.source_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.classifier_concurrency == 0 {
            return Err(ValidationError::InvalidConcurrency);
        }
        if self.windows.chat_half_window_hours <= 0
            || self.windows.meeting_half_window_hours <= 0
            || self.windows.tracker_half_window_hours <= 0
        {
            return Err(ValidationError::InvalidWindow);
        }
        for params in [&self.windows.chat, &self.windows.meeting, &self.windows.tracker] {
            if !(0.0..=1.0).contains(&params.base) || !(0.0..=1.0).contains(&params.cap) {
                return Err(ValidationError::InvalidConfidenceParam);
            }
        }
        Ok(())
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            windows: WindowPolicy::default(),
            source_timeout_secs: default_source_timeout(),
            classifier_concurrency: default_classifier_concurrency(),
        }
    }
}

fn default_source_timeout() -> u64 {
    10
}

fn default_classifier_concurrency() -> usize {
    4
}
