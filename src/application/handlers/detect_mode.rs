//! DetectWorkspaceModeHandler - Query handler for workspace-mode scoring.
//!
//! Enriches the caller's observation with the actor's recent content
//! previews, then runs the weighted-evidence scorer and the
//! sticky-confirmation rule.

use std::sync::Arc;

use tracing::debug;

use crate::domain::foundation::ActorId;
use crate::domain::workspace_mode::{
    ModeBandPolicy, ModeObservation, ModeRecommendation, ModeScorer, WorkspaceMode,
};
use crate::ports::AnalysisStore;

/// Recent events scanned for backlog/board references.
const SCAN_EVENT_LIMIT: usize = 10;

/// Query to score a workspace's single- vs multi-project evidence.
#[derive(Debug, Clone)]
pub struct DetectWorkspaceModeQuery {
    pub actor: ActorId,
    /// Counts and scan text gathered by the caller.
    pub observation: ModeObservation,
    /// The mode currently stored for the workspace.
    pub stored_mode: WorkspaceMode,
}

/// Scores mode evidence and applies the banding rules.
pub struct DetectWorkspaceModeHandler {
    analysis_store: Arc<dyn AnalysisStore>,
    policy: ModeBandPolicy,
}

impl DetectWorkspaceModeHandler {
    pub fn new(analysis_store: Arc<dyn AnalysisStore>, policy: ModeBandPolicy) -> Self {
        Self {
            analysis_store,
            policy,
        }
    }

    /// Scores the observation, first widening its scan text with recent
    /// history. An unreachable history store only narrows the scan; it
    /// never fails the query.
    pub async fn handle(&self, query: DetectWorkspaceModeQuery) -> ModeRecommendation {
        let mut observation = query.observation;

        match self
            .analysis_store
            .recent_events(&query.actor, SCAN_EVENT_LIMIT)
            .await
        {
            Ok(events) => {
                for event in &events {
                    observation.scan_text.push('\n');
                    observation.scan_text.push_str(&event.content_preview);
                }
            }
            Err(err) => {
                debug!(
                    actor = %query.actor,
                    error = %err.message,
                    "History unavailable, scoring with caller observation only"
                );
            }
        }

        let recommendation = ModeScorer::recommend(&observation, query.stored_mode, &self.policy);
        debug!(
            actor = %query.actor,
            score = recommendation.score,
            band = ?recommendation.band,
            "Workspace mode scored"
        );
        recommendation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::domain::event::AnalysisEvent;
    use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, WorkspaceId};
    use crate::domain::sources::SourceFamily;
    use crate::domain::workspace_mode::{ModeBand, ProjectMode};

    struct MockAnalysisStore {
        previews: Vec<String>,
        should_fail: bool,
    }

    #[async_trait]
    impl AnalysisStore for MockAnalysisStore {
        async fn recent_events(
            &self,
            actor: &ActorId,
            _limit: usize,
        ) -> Result<Vec<AnalysisEvent>, DomainError> {
            if self.should_fail {
                return Err(DomainError::new(
                    ErrorCode::HistoryUnavailable,
                    "history down",
                ));
            }
            Ok(self
                .previews
                .iter()
                .map(|preview| {
                    AnalysisEvent::new(
                        WorkspaceId::new("ws-1").unwrap(),
                        actor.clone(),
                        SourceFamily::Chat,
                        Timestamp::from_unix_secs(1_700_000_000),
                        preview.clone(),
                    )
                })
                .collect())
        }
    }

    fn actor() -> ActorId {
        ActorId::new("team-1").unwrap()
    }

    #[tokio::test]
    async fn history_previews_widen_the_backlog_scan() {
        let handler = DetectWorkspaceModeHandler::new(
            Arc::new(MockAnalysisStore {
                previews: vec![
                    "progress on backlog alpha".to_string(),
                    "review of board beta and sprint board gamma".to_string(),
                ],
                should_fail: false,
            }),
            ModeBandPolicy::default(),
        );

        let recommendation = handler
            .handle(DetectWorkspaceModeQuery {
                actor: actor(),
                observation: ModeObservation {
                    distinct_project_mentions: 2,
                    ..Default::default()
                },
                stored_mode: WorkspaceMode::AutoDetect,
            })
            .await;

        // 2 projects (0.20) + 3 unique refs from history (0.40) = 0.60.
        assert!((recommendation.score - 0.60).abs() < 1e-9);
        assert_eq!(recommendation.band, ModeBand::GreyZone);
        assert!(recommendation.requires_confirmation);
    }

    #[tokio::test]
    async fn history_outage_scores_the_caller_observation_alone() {
        let handler = DetectWorkspaceModeHandler::new(
            Arc::new(MockAnalysisStore {
                previews: vec![],
                should_fail: true,
            }),
            ModeBandPolicy::default(),
        );

        let recommendation = handler
            .handle(DetectWorkspaceModeQuery {
                actor: actor(),
                observation: ModeObservation::default(),
                stored_mode: WorkspaceMode::AutoDetect,
            })
            .await;

        assert_eq!(recommendation.band, ModeBand::Single);
        assert_eq!(recommendation.detected, ProjectMode::SingleProject);
    }

    #[tokio::test]
    async fn confirmed_mode_stays_sticky() {
        let handler = DetectWorkspaceModeHandler::new(
            Arc::new(MockAnalysisStore {
                previews: vec![],
                should_fail: false,
            }),
            ModeBandPolicy::default(),
        );

        let recommendation = handler
            .handle(DetectWorkspaceModeQuery {
                actor: actor(),
                observation: ModeObservation {
                    distinct_project_mentions: 5,
                    scan_text: "backlog a, backlog b, backlog c".to_string(),
                    cross_workspace_dependencies: 3,
                    active_top_level_goals: 4,
                    misaligned_recent_goals: 2,
                },
                stored_mode: WorkspaceMode::Confirmed(ProjectMode::SingleProject),
            })
            .await;

        assert_eq!(recommendation.detected, ProjectMode::MultiProject);
        assert_eq!(
            recommendation.applied_mode,
            WorkspaceMode::Confirmed(ProjectMode::SingleProject)
        );
        assert!(!recommendation.requires_confirmation);
    }
}
