//! Workspace mode types.

use serde::{Deserialize, Serialize};

/// How a workspace's projects are organized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectMode {
    SingleProject,
    MultiProject,
}

/// The stored mode setting for a workspace.
///
/// A human-confirmed mode is sticky: re-detection updates confidence and
/// metadata but never silently overrides the confirmed mode. Only
/// `AutoDetect` is re-evaluated freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "mode")]
pub enum WorkspaceMode {
    AutoDetect,
    Confirmed(ProjectMode),
}

/// Decision band the mode score fell into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeBand {
    /// Score >= 0.70: confident multi-project, auto-apply.
    ConfidentMulti,
    /// Score in [0.50, 0.70): multi-project recommended, needs human
    /// confirmation before applying.
    GreyZone,
    /// Score < 0.50: single-project.
    Single,
}

/// Operational settings that travel with a mode decision.
///
/// Returned explicitly alongside the decision rather than mutated into
/// ambient global state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeSettings {
    /// Multiplier applied to capacity thresholds downstream.
    pub capacity_threshold_multiplier: f64,
    /// Whether detectors should partition evidence per project.
    pub partition_by_project: bool,
}

impl ModeSettings {
    /// Settings for a project mode.
    pub fn for_mode(mode: ProjectMode) -> Self {
        match mode {
            ProjectMode::SingleProject => Self {
                capacity_threshold_multiplier: 1.0,
                partition_by_project: false,
            },
            ProjectMode::MultiProject => Self {
                capacity_threshold_multiplier: 1.4,
                partition_by_project: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_follow_the_mode() {
        let single = ModeSettings::for_mode(ProjectMode::SingleProject);
        assert_eq!(single.capacity_threshold_multiplier, 1.0);
        assert!(!single.partition_by_project);

        let multi = ModeSettings::for_mode(ProjectMode::MultiProject);
        assert!(multi.capacity_threshold_multiplier > 1.0);
        assert!(multi.partition_by_project);
    }

    #[test]
    fn workspace_mode_serializes_with_tag() {
        let json = serde_json::to_string(&WorkspaceMode::Confirmed(ProjectMode::MultiProject))
            .unwrap();
        assert!(json.contains("confirmed"));
        assert!(json.contains("multi_project"));
    }
}
