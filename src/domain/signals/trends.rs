//! Trend promotion engine.
//!
//! Aggregates weak signals of the same type across analysis cycles into a
//! confirmed-pending "emerging trend". Recomputed fresh on every call -
//! idempotent by construction, no incremental state machine. Callers that
//! persist trends must upsert by `(actor, signal_type)`.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::domain::foundation::{ActorId, DetectionScore, SignalId, TrendId};
use crate::domain::signals::{SignalStatus, SignalType, WeakSignal};

/// Minimum same-type active signals required for promotion.
pub const PROMOTION_MIN_SIGNALS: usize = 3;

/// Lifecycle status of an emerging trend.
///
/// The flip to `Confirmed` happens when an external reviewer accepts the
/// trend; that transition is outside this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendStatus {
    Emerging,
    Confirmed,
}

/// A promoted trend backed by repeated weak signals.
///
/// Confidence lies in the emerging stratum [40, 59], growing with the
/// number of supporting analysis cycles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergingTrend {
    pub trend_id: TrendId,
    pub actor: ActorId,
    pub name: String,
    pub signal_type: SignalType,
    pub confidence: DetectionScore,
    pub sprint_count: usize,
    pub source_signal_ids: Vec<SignalId>,
    pub hypothesis: String,
    pub status: TrendStatus,
}

static HYPOTHESES: Lazy<HashMap<SignalType, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            SignalType::LinguisticDrift,
            "Team vocabulary is shifting, possibly tracking a change in work focus or morale",
        ),
        (
            SignalType::RecurringBlocker,
            "A structural dependency keeps resurfacing and is not being resolved at the root",
        ),
        (
            SignalType::BlockerAnomaly,
            "Blocker load is escalating beyond the team's historical baseline",
        ),
    ])
});

const FALLBACK_HYPOTHESIS: &str = "An evolution to monitor across upcoming cycles";

/// Promotes groups of same-type weak signals into emerging trends.
pub struct TrendPromotion;

impl TrendPromotion {
    /// Groups active signals by type and promotes every group with at least
    /// [`PROMOTION_MIN_SIGNALS`] members.
    ///
    /// Pure over its input: the same signal set yields trends with the same
    /// confidence and hypothesis (trend ids are fresh; persisting callers
    /// upsert by `(actor, signal_type)`).
    pub fn promote(actor: &ActorId, signals: &[WeakSignal]) -> Vec<EmergingTrend> {
        // BTreeMap keyed by label for deterministic output order.
        let mut groups: BTreeMap<&'static str, (SignalType, Vec<&WeakSignal>)> = BTreeMap::new();
        for signal in signals.iter().filter(|s| s.status == SignalStatus::Active) {
            groups
                .entry(signal.signal_type.label())
                .or_insert((signal.signal_type, Vec::new()))
                .1
                .push(signal);
        }

        groups
            .into_values()
            .filter(|(_, members)| members.len() >= PROMOTION_MIN_SIGNALS)
            .map(|(signal_type, members)| Self::build(actor, signal_type, &members))
            .collect()
    }

    /// Confidence for a promoted group: min(40 + 5 * count, 59).
    pub fn confidence_for(count: usize) -> DetectionScore {
        DetectionScore::from_f64((40.0 + 5.0 * count as f64).min(59.0))
    }

    /// Hypothesis for a signal type, with a generic fallback.
    pub fn hypothesis_for(signal_type: SignalType) -> &'static str {
        HYPOTHESES.get(&signal_type).copied().unwrap_or(FALLBACK_HYPOTHESIS)
    }

    fn build(actor: &ActorId, signal_type: SignalType, members: &[&WeakSignal]) -> EmergingTrend {
        EmergingTrend {
            trend_id: TrendId::new(),
            actor: actor.clone(),
            name: format!("Recurring {} signals", signal_type.label()),
            signal_type,
            confidence: Self::confidence_for(members.len()),
            sprint_count: members.len(),
            source_signal_ids: members.iter().map(|s| s.signal_id).collect(),
            hypothesis: Self::hypothesis_for(signal_type).to_string(),
            status: TrendStatus::Emerging,
        }
    }
}
