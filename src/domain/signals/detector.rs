//! Statistical and temporal weak-signal detection.
//!
//! Operates over a rolling window of prior analysis records to surface
//! linguistic drift, recurring blockers, and statistical outliers in
//! blocker counts. All thresholds are empirically chosen constants carried
//! through configuration; they are preserved, not re-derived.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::domain::event::AnalysisEvent;
use crate::domain::foundation::{ActorId, DetectionScore};
use crate::domain::signals::statistics::{mean, population_std_dev, z_score};
use crate::domain::signals::{SignalType, WeakSignal};

/// Tunable detector parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorPolicy {
    /// Minimum historical events; below this the detector short-circuits to
    /// an empty result (insufficient data, not an error).
    pub min_history: usize,
    /// Rolling window length in days, used when fetching history.
    pub history_days: i64,
    /// Z-score threshold for the blocker-count anomaly detector.
    pub z_threshold: f64,
    /// Minimum percentage delta for the linguistic-drift detector.
    pub drift_delta_threshold: f64,
    /// Truncated-key length for recurrence grouping.
    pub recurrence_key_chars: usize,
    /// Minimum group count for a blocker to be considered repeating.
    pub recurrence_min_count: usize,
}

impl Default for DetectorPolicy {
    fn default() -> Self {
        Self {
            min_history: 3,
            history_days: 30,
            z_threshold: 2.5,
            drift_delta_threshold: 15.0,
            recurrence_key_chars: 50,
            recurrence_min_count: 2,
        }
    }
}

/// Drift measurement reported by the classification collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftObservation {
    /// Percentage change between current and historical content.
    pub delta: f64,
    /// The collaborator's self-reported confidence, if it gave one.
    /// Observations without a confidence are discarded.
    pub reported_confidence: Option<DetectionScore>,
}

/// Statistical & temporal signal detector.
pub struct SignalDetector;

impl SignalDetector {
    /// Runs all detectors over the history for one actor.
    ///
    /// `history` holds prior events in chronological order; `current` is the
    /// event under analysis. Fewer than `min_history` prior events
    /// short-circuits to no signals.
    pub fn detect(
        actor: &ActorId,
        history: &[AnalysisEvent],
        current: &AnalysisEvent,
        drift: Option<DriftObservation>,
        policy: &DetectorPolicy,
    ) -> Vec<WeakSignal> {
        if history.len() < policy.min_history {
            debug!(
                actor = %actor,
                history_len = history.len(),
                "Insufficient history, skipping signal detection"
            );
            return Vec::new();
        }

        let mut signals = Vec::new();

        if let Some(observation) = drift {
            if let Some(signal) = Self::linguistic_drift(actor, &observation, policy) {
                signals.push(signal);
            }
        }
        if let Some(signal) = Self::recurring_blocker(actor, history, policy) {
            signals.push(signal);
        }
        if let Some(signal) = Self::blocker_anomaly(actor, history, current, policy) {
            signals.push(signal);
        }

        signals
    }

    /// Linguistic drift: accept only when the classifier-reported delta
    /// exceeds the threshold and a self-reported confidence exists.
    pub fn linguistic_drift(
        actor: &ActorId,
        observation: &DriftObservation,
        policy: &DetectorPolicy,
    ) -> Option<WeakSignal> {
        if observation.delta <= policy.drift_delta_threshold {
            return None;
        }
        let confidence = observation.reported_confidence?;
        Some(WeakSignal::active(
            actor.clone(),
            SignalType::LinguisticDrift,
            format!(
                "Content language shifted {:.0}% against the rolling history",
                observation.delta
            ),
            confidence,
            observation.delta,
            policy.drift_delta_threshold,
        ))
    }

    /// Temporal recurrence: groups prior blocker descriptions by a
    /// truncated, lowercased key; any group reaching the minimum count is a
    /// repeating pattern. Confidence = min(60 + 5 * frequency, 79).
    pub fn recurring_blocker(
        actor: &ActorId,
        history: &[AnalysisEvent],
        policy: &DetectorPolicy,
    ) -> Option<WeakSignal> {
        let mut groups: HashMap<String, (usize, String)> = HashMap::new();
        for event in history {
            for description in &event.blocker_descriptions {
                let key: String = description
                    .to_lowercase()
                    .chars()
                    .take(policy.recurrence_key_chars)
                    .collect();
                let entry = groups.entry(key).or_insert((0, description.clone()));
                entry.0 += 1;
            }
        }

        let (frequency, sample) = groups
            .into_values()
            .max_by_key(|(count, _)| *count)
            .filter(|(count, _)| *count >= policy.recurrence_min_count)?;

        let confidence = DetectionScore::from_f64((60.0 + 5.0 * frequency as f64).min(79.0));
        Some(WeakSignal::active(
            actor.clone(),
            SignalType::RecurringBlocker,
            format!("Blocker repeated {frequency} times across recent cycles: {sample}"),
            confidence,
            frequency as f64,
            policy.recurrence_min_count as f64,
        ))
    }

    /// Statistical anomaly: z-score of the current blocker count against
    /// the window of prior counts plus the current one. A zero standard
    /// deviation yields z = 0 and therefore no signal.
    pub fn blocker_anomaly(
        actor: &ActorId,
        history: &[AnalysisEvent],
        current: &AnalysisEvent,
        policy: &DetectorPolicy,
    ) -> Option<WeakSignal> {
        let mut counts: Vec<f64> = history.iter().map(|e| e.blocker_count as f64).collect();
        counts.push(current.blocker_count as f64);

        let m = mean(&counts);
        let sd = population_std_dev(&counts);
        let z = z_score(current.blocker_count as f64, m, sd);

        if z <= policy.z_threshold {
            return None;
        }

        let confidence = DetectionScore::from_f64((60.0 + 10.0 * (z - policy.z_threshold)).min(79.0));
        Some(WeakSignal::active(
            actor.clone(),
            SignalType::BlockerAnomaly,
            format!(
                "Blocker count {} deviates {:.2} standard deviations from the recent mean {:.1}",
                current.blocker_count, z, m
            ),
            confidence,
            z,
            policy.z_threshold,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Timestamp, WorkspaceId};
    use crate::domain::sources::SourceFamily;

    fn actor() -> ActorId {
        ActorId::new("team-1").unwrap()
    }

    fn event(blocker_count: u32, blockers: &[&str]) -> AnalysisEvent {
        let mut event = AnalysisEvent::new(
            WorkspaceId::new("ws-1").unwrap(),
            actor(),
            SourceFamily::Chat,
            Timestamp::from_unix_secs(1_700_000_000),
            "preview",
        );
        event.blocker_count = blocker_count;
        event.blocker_descriptions = blockers.iter().map(|b| b.to_string()).collect();
        event
    }

    fn policy() -> DetectorPolicy {
        DetectorPolicy::default()
    }

    #[test]
    fn fewer_than_three_events_short_circuits() {
        let history = vec![event(2, &[]), event(3, &[])];
        let signals = SignalDetector::detect(&actor(), &history, &event(9, &[]), None, &policy());
        assert!(signals.is_empty());
    }

    #[test]
    fn moderate_spike_does_not_trip_anomaly() {
        // History [2,3,2,2] + current 9: mean 3.6, z about 2.0, below 2.5.
        let history = vec![event(2, &[]), event(3, &[]), event(2, &[]), event(2, &[])];
        let signal = SignalDetector::blocker_anomaly(&actor(), &history, &event(9, &[]), &policy());
        assert!(signal.is_none());
    }

    #[test]
    fn single_large_multiple_of_mean_is_still_below_threshold() {
        // History [2,2,2,2] + current 14: z just under 2.0. The detector
        // requires very strong skew, not a single multiple-of-mean spike.
        let history = vec![event(2, &[]), event(2, &[]), event(2, &[]), event(2, &[])];
        let signal =
            SignalDetector::blocker_anomaly(&actor(), &history, &event(14, &[]), &policy());
        assert!(signal.is_none());
    }

    #[test]
    fn extreme_outlier_trips_anomaly_in_weak_band() {
        // Long stable history makes the deviation dominate.
        let history: Vec<_> = (0..12).map(|_| event(2, &[])).collect();
        let signal = SignalDetector::blocker_anomaly(&actor(), &history, &event(30, &[]), &policy())
            .expect("outlier should trip the detector");

        assert_eq!(signal.signal_type, SignalType::BlockerAnomaly);
        assert!(signal.metric_value > 2.5);
        assert!((60..=79).contains(&signal.confidence.value()));
    }

    #[test]
    fn constant_history_never_signals() {
        // stddev 0 forces z to 0 regardless of the current count.
        let history = vec![event(4, &[]), event(4, &[]), event(4, &[])];
        let signal = SignalDetector::blocker_anomaly(&actor(), &history, &event(4, &[]), &policy());
        assert!(signal.is_none());
    }

    #[test]
    fn recurring_blocker_groups_by_truncated_key() {
        let history = vec![
            event(1, &["Waiting on platform team to provision the staging environment ASAP"]),
            event(1, &["waiting on platform team to provision the staging environment again"]),
            event(1, &["unrelated blocker"]),
        ];
        let signal = SignalDetector::recurring_blocker(&actor(), &history, &policy())
            .expect("repeated blocker should signal");

        assert_eq!(signal.signal_type, SignalType::RecurringBlocker);
        assert_eq!(signal.metric_value, 2.0);
        // min(60 + 5*2, 79)
        assert_eq!(signal.confidence.value(), 70);
    }

    #[test]
    fn recurrence_confidence_caps_at_79() {
        let blockers: Vec<String> = (0..6).map(|_| "same blocker".to_string()).collect();
        let refs: Vec<&str> = blockers.iter().map(|s| s.as_str()).collect();
        let history = vec![event(1, &refs), event(1, &[]), event(1, &[])];

        let signal = SignalDetector::recurring_blocker(&actor(), &history, &policy()).unwrap();
        assert_eq!(signal.confidence.value(), 79);
    }

    #[test]
    fn unique_blockers_do_not_signal() {
        let history = vec![
            event(1, &["blocker a"]),
            event(1, &["blocker b"]),
            event(1, &["blocker c"]),
        ];
        assert!(SignalDetector::recurring_blocker(&actor(), &history, &policy()).is_none());
    }

    #[test]
    fn drift_below_delta_threshold_is_ignored() {
        let observation = DriftObservation {
            delta: 15.0,
            reported_confidence: Some(DetectionScore::new(70)),
        };
        assert!(SignalDetector::linguistic_drift(&actor(), &observation, &policy()).is_none());
    }

    #[test]
    fn drift_without_reported_confidence_is_discarded() {
        let observation = DriftObservation {
            delta: 40.0,
            reported_confidence: None,
        };
        assert!(SignalDetector::linguistic_drift(&actor(), &observation, &policy()).is_none());
    }

    #[test]
    fn drift_above_threshold_with_confidence_signals() {
        let observation = DriftObservation {
            delta: 28.0,
            reported_confidence: Some(DetectionScore::new(72)),
        };
        let signal = SignalDetector::linguistic_drift(&actor(), &observation, &policy()).unwrap();
        assert_eq!(signal.signal_type, SignalType::LinguisticDrift);
        assert_eq!(signal.confidence.value(), 72);
        assert_eq!(signal.metric_value, 28.0);
    }

    #[test]
    fn multiple_detectors_can_fire_in_one_call() {
        let mut history: Vec<_> = (0..10).map(|_| event(2, &["same persistent blocker"])).collect();
        history.push(event(2, &["same persistent blocker"]));

        let drift = DriftObservation {
            delta: 30.0,
            reported_confidence: Some(DetectionScore::new(75)),
        };
        let signals =
            SignalDetector::detect(&actor(), &history, &event(30, &[]), Some(drift), &policy());

        let types: Vec<_> = signals.iter().map(|s| s.signal_type).collect();
        assert!(types.contains(&SignalType::LinguisticDrift));
        assert!(types.contains(&SignalType::RecurringBlocker));
        assert!(types.contains(&SignalType::BlockerAnomaly));
    }
}
