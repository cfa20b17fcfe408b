//! Feature flags

use serde::Deserialize;

/// Feature flags
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    /// Allow strong re-detection evidence to override a human-confirmed
    /// workspace mode. Default false: confirmed wins.
    #[serde(default)]
    pub allow_confirmed_override: bool,

    /// Run the workspace-mode scorer as part of reconciliation when the
    /// caller supplies a mode observation.
    #[serde(default = "default_true")]
    pub mode_detection_enabled: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            allow_confirmed_override: false,
            mode_detection_enabled: true,
        }
    }
}

fn default_true() -> bool {
    true
}
