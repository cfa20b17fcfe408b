//! ReconcileAnalysisHandler - the reconciliation pipeline.
//!
//! Orchestrates one full run over an analysis event:
//! catalog fetch and source resolution in parallel, cross-source confidence
//! fusion, stratified pattern matching (markers, hints, classifier),
//! statistical weak-signal detection over the actor's history, trend
//! promotion, optional workspace-mode scoring, and fire-and-forget
//! persistence of the derived artifacts.
//!
//! Every collaborator failure degrades the report instead of aborting it;
//! the degradation is surfaced through [`Warning`] entries.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::domain::catalog::{CatalogFilter, CeremonyType, PatternCatalogEntry};
use crate::domain::detection::{PatternDetection, StratifiedMatcher, TextUnit};
use crate::domain::event::AnalysisEvent;
use crate::domain::report::{MergedCounts, ReconciliationReport, Warning, WarningComponent};
use crate::domain::signals::{DriftObservation, SignalDetector, TrendPromotion};
use crate::domain::sources::ConfidenceFusion;
use crate::domain::workspace_mode::{ModeObservation, ModeScorer, WorkspaceMode};
use crate::ports::{AnalysisStore, CatalogStore, Classifier, DetectionStore, TrendStore, WeakSignalStore};

use super::resolve_sources::{ResolveSourcesHandler, ResolveSourcesQuery};

/// Upper bound on history events fetched per run; the detector policy's
/// day window prunes further.
const HISTORY_FETCH_LIMIT: usize = 50;

/// Command to reconcile one analysis event.
#[derive(Debug, Clone)]
pub struct ReconcileAnalysisCommand {
    /// The event under analysis.
    pub event: AnalysisEvent,
    /// Ceremony context, used to filter applicable catalog patterns.
    pub ceremony: Option<CeremonyType>,
    /// Observation for workspace-mode scoring; None skips mode detection.
    pub mode_observation: Option<ModeObservation>,
    /// The workspace's currently stored mode setting.
    pub stored_mode: WorkspaceMode,
}

/// Runs the reconciliation pipeline for one analysis event.
pub struct ReconcileAnalysisHandler {
    resolver: Arc<ResolveSourcesHandler>,
    catalog_store: Arc<dyn CatalogStore>,
    classifier: Arc<dyn Classifier>,
    analysis_store: Arc<dyn AnalysisStore>,
    detection_store: Arc<dyn DetectionStore>,
    signal_store: Arc<dyn WeakSignalStore>,
    trend_store: Arc<dyn TrendStore>,
    config: EngineConfig,
}

impl ReconcileAnalysisHandler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        resolver: Arc<ResolveSourcesHandler>,
        catalog_store: Arc<dyn CatalogStore>,
        classifier: Arc<dyn Classifier>,
        analysis_store: Arc<dyn AnalysisStore>,
        detection_store: Arc<dyn DetectionStore>,
        signal_store: Arc<dyn WeakSignalStore>,
        trend_store: Arc<dyn TrendStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            resolver,
            catalog_store,
            classifier,
            analysis_store,
            detection_store,
            signal_store,
            trend_store,
            config,
        }
    }

    /// Runs the full pipeline. Never fails: partial failures degrade the
    /// report and are listed in its warnings.
    pub async fn handle(&self, command: ReconcileAnalysisCommand) -> ReconciliationReport {
        let event = &command.event;

        let filter = command
            .ceremony
            .map(CatalogFilter::for_ceremony)
            .unwrap_or_else(CatalogFilter::all);

        let (catalog_result, resolved) = tokio::join!(
            self.catalog_store.list_active(&filter),
            self.resolver.handle(ResolveSourcesQuery {
                workspace_id: event.workspace_id.clone(),
                analysis_time: event.occurred_at,
            })
        );

        let mut warnings = resolved.warnings;

        // Catalog down: fusion and statistics still run, matching does not.
        let catalog = match catalog_result {
            Ok(entries) => entries,
            Err(err) => {
                warnings.push(Warning::new(WarningComponent::Catalog, err.message));
                Vec::new()
            }
        };

        let cross_source_confidence = ConfidenceFusion::fuse(&resolved.contributing);
        let merged_counts = MergedCounts::merge(event, &resolved.contributing);

        let mut units = Vec::with_capacity(resolved.units.len() + 1);
        units.push(TextUnit::new(
            event.primary_source,
            event.content_preview.clone(),
        ));
        units.extend(resolved.units);

        let pattern_detections = self
            .detect_patterns(event, &units, &catalog, command.ceremony, &mut warnings)
            .await;

        let (weak_signals, emerging_trends) =
            self.detect_signals(event, &mut warnings).await;

        let mode_recommendation = if self.config.features.mode_detection_enabled {
            command
                .mode_observation
                .as_ref()
                .map(|observation| self.recommend_mode(observation, command.stored_mode))
        } else {
            None
        };

        self.persist(
            &pattern_detections,
            &weak_signals,
            &emerging_trends,
            &mut warnings,
        )
        .await;

        let report = ReconciliationReport {
            analysis_id: event.analysis_id,
            contributing_sources: resolved.contributing,
            merged_counts,
            cross_source_confidence,
            pattern_detections,
            weak_signals,
            emerging_trends,
            mode_recommendation,
            warnings,
        };

        info!(
            analysis_id = %report.analysis_id,
            sources = report.contributing_sources.len(),
            detections = report.pattern_detections.len(),
            signals = report.weak_signals.len(),
            trends = report.emerging_trends.len(),
            degraded = report.is_degraded(),
            "Reconciliation complete"
        );
        report
    }

    /// Stratified matching: marker/hint inference plus classifier opinions,
    /// deduplicated and capped by the matcher policy.
    async fn detect_patterns(
        &self,
        event: &AnalysisEvent,
        units: &[TextUnit],
        catalog: &[PatternCatalogEntry],
        ceremony: Option<CeremonyType>,
        warnings: &mut Vec<Warning>,
    ) -> Vec<PatternDetection> {
        if catalog.is_empty() {
            return Vec::new();
        }

        let policy = &self.config.detection.matcher;
        let mut detections: Vec<PatternDetection> = units
            .iter()
            .flat_map(|unit| {
                StratifiedMatcher::match_unit(event.analysis_id, unit, catalog, ceremony, policy)
            })
            .collect();

        // Classifier opinions, bounded by the configured concurrency. The
        // collaborator having no opinion or being down is degraded, not
        // fatal.
        let semaphore = Arc::new(Semaphore::new(
            self.config.sources.classifier_concurrency,
        ));
        let opinions = join_all(units.iter().map(|unit| {
            let semaphore = Arc::clone(&semaphore);
            async move {
                let _permit = semaphore.acquire().await.ok();
                self.classifier.classify(&unit.text, catalog).await
            }
        }))
        .await;

        let mut classifier_failures = 0usize;
        for (unit, opinion) in units.iter().zip(opinions) {
            match opinion {
                Ok(classification) => {
                    for label in &classification.labels {
                        if let Some(entry) = catalog.iter().find(|e| &e.pattern_id == label) {
                            if let Some(detection) = StratifiedMatcher::from_classifier(
                                event.analysis_id,
                                unit,
                                entry,
                                classification.confidence,
                            ) {
                                detections.push(detection);
                            }
                        }
                    }
                }
                Err(err) => {
                    debug!(error = %err.message, "Classifier call failed");
                    classifier_failures += 1;
                }
            }
        }
        if classifier_failures > 0 {
            warnings.push(Warning::new(
                WarningComponent::Classifier,
                format!(
                    "classification unavailable for {classifier_failures} of {} units",
                    units.len()
                ),
            ));
        }

        StratifiedMatcher::finalize(detections, policy)
    }

    /// Statistical and temporal detection over the actor's history, plus
    /// trend promotion over the resulting signals.
    async fn detect_signals(
        &self,
        event: &AnalysisEvent,
        warnings: &mut Vec<Warning>,
    ) -> (
        Vec<crate::domain::signals::WeakSignal>,
        Vec<crate::domain::signals::EmergingTrend>,
    ) {
        let policy = &self.config.detection.detector;

        let history = match self
            .analysis_store
            .recent_events(&event.actor, HISTORY_FETCH_LIMIT)
            .await
        {
            Ok(events) => {
                let horizon = event.occurred_at.minus_days(policy.history_days);
                events
                    .into_iter()
                    .filter(|e| !e.occurred_at.is_before(&horizon))
                    .collect::<Vec<_>>()
            }
            Err(err) => {
                warnings.push(Warning::new(WarningComponent::History, err.message));
                return (Vec::new(), Vec::new());
            }
        };

        let drift = self.measure_drift(event, &history).await;

        let signals = SignalDetector::detect(&event.actor, &history, event, drift, policy);

        // Promotion looks at signals accumulated across cycles, not just
        // this run's.
        let mut accumulated = match self.signal_store.list_active(&event.actor).await {
            Ok(prior) => prior,
            Err(err) => {
                warnings.push(Warning::new(WarningComponent::SignalStore, err.message));
                Vec::new()
            }
        };
        accumulated.extend(signals.iter().cloned());
        let trends = TrendPromotion::promote(&event.actor, &accumulated);

        (signals, trends)
    }

    /// Asks the classifier for a drift measurement against the most recent
    /// historical content. No history or no classifier means no drift
    /// observation, which the detector treats as "nothing to report".
    async fn measure_drift(
        &self,
        event: &AnalysisEvent,
        history: &[AnalysisEvent],
    ) -> Option<DriftObservation> {
        let previous = history.last()?;
        match self
            .classifier
            .compare_drift(&event.content_preview, &previous.content_preview)
            .await
        {
            Ok(report) => Some(DriftObservation {
                delta: report.delta,
                reported_confidence: report.confidence,
            }),
            Err(err) => {
                debug!(error = %err.message, "Drift comparison failed, skipping");
                None
            }
        }
    }

    fn recommend_mode(
        &self,
        observation: &ModeObservation,
        stored: WorkspaceMode,
    ) -> crate::domain::workspace_mode::ModeRecommendation {
        let mut policy = self.config.detection.mode_bands.clone();
        // The feature flag can loosen stickiness globally.
        policy.allow_confirmed_override |= self.config.features.allow_confirmed_override;
        ModeScorer::recommend(observation, stored, &policy)
    }

    /// Fire-and-forget persistence: each write failure is a warning, never
    /// an abort, and never blocks the other writes.
    async fn persist(
        &self,
        detections: &[PatternDetection],
        signals: &[crate::domain::signals::WeakSignal],
        trends: &[crate::domain::signals::EmergingTrend],
        warnings: &mut Vec<Warning>,
    ) {
        for detection in detections {
            if let Err(err) = self.detection_store.create(detection.clone()).await {
                warnings.push(Warning::new(
                    WarningComponent::DetectionStore,
                    format!("detection '{}': {}", detection.pattern_id, err.message),
                ));
            }
        }
        for signal in signals {
            if let Err(err) = self.signal_store.create(signal.clone()).await {
                warnings.push(Warning::new(
                    WarningComponent::SignalStore,
                    format!("signal '{}': {}", signal.signal_type, err.message),
                ));
            }
        }
        for trend in trends {
            if let Err(err) = self.trend_store.upsert(trend.clone()).await {
                warnings.push(Warning::new(
                    WarningComponent::TrendStore,
                    format!("trend '{}': {}", trend.name, err.message),
                ));
            }
        }
    }
}
