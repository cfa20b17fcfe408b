//! Classifier port - the opaque text-classification collaborator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::catalog::PatternCatalogEntry;
use crate::domain::foundation::{DetectionScore, DomainError};

/// Structured opinion returned by the classification collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    /// Self-reported confidence; the only non-hint path to the canonical
    /// stratum.
    pub confidence: DetectionScore,
    /// Pattern ids the collaborator recognized in the text.
    pub labels: Vec<String>,
    /// Free-text justification.
    pub justification: String,
}

/// Drift measurement between current and historical content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftReport {
    /// Percentage change between the two bodies of text.
    pub delta: f64,
    /// Self-reported confidence, absent when the collaborator declines to
    /// commit to one.
    pub confidence: Option<DetectionScore>,
}

/// Opaque text-classification collaborator.
///
/// May fail with `ClassifierUnavailable`; callers treat that as "no
/// opinion", never as a hard error.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classifies one text unit against the active catalog context.
    async fn classify(
        &self,
        text: &str,
        catalog_context: &[PatternCatalogEntry],
    ) -> Result<Classification, DomainError>;

    /// Compares current content against historical content, reporting a
    /// percentage drift.
    async fn compare_drift(
        &self,
        current: &str,
        historical: &str,
    ) -> Result<DriftReport, DomainError>;
}
