//! Weak signal types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{ActorId, DetectionScore, SignalId};

/// The statistical/temporal detectors that can emit a weak signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    /// Current content has drifted linguistically from the history.
    LinguisticDrift,
    /// The same blocker keeps recurring across analysis cycles.
    RecurringBlocker,
    /// Blocker count is a statistical outlier against the history.
    BlockerAnomaly,
}

impl SignalType {
    /// Returns the display label for this signal type.
    pub fn label(&self) -> &'static str {
        match self {
            SignalType::LinguisticDrift => "linguistic_drift",
            SignalType::RecurringBlocker => "recurring_blocker",
            SignalType::BlockerAnomaly => "blocker_anomaly",
        }
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Lifecycle status of a weak signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalStatus {
    /// Emitted and awaiting trend promotion.
    Active,
    /// Consumed by the trend promotion engine.
    Consumed,
}

/// One weak signal emitted when a detector exceeds its threshold.
///
/// Confidence always lies in the weak-signal stratum [60, 79].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeakSignal {
    pub signal_id: SignalId,
    pub actor: ActorId,
    pub signal_type: SignalType,
    pub description: String,
    pub confidence: DetectionScore,
    /// The observed metric that tripped the detector.
    pub metric_value: f64,
    /// The threshold the metric was compared against.
    pub threshold: f64,
    pub status: SignalStatus,
}

impl WeakSignal {
    /// Creates an active weak signal, clamping confidence into [60, 79].
    pub fn active(
        actor: ActorId,
        signal_type: SignalType,
        description: impl Into<String>,
        confidence: DetectionScore,
        metric_value: f64,
        threshold: f64,
    ) -> Self {
        Self {
            signal_id: SignalId::new(),
            actor,
            signal_type,
            description: description.into(),
            confidence: DetectionScore::new(confidence.value().clamp(60, 79)),
            metric_value,
            threshold,
            status: SignalStatus::Active,
        }
    }
}
