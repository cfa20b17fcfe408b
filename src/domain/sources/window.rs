//! Source families and relevance time windows.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{SourceConfidence, Timestamp};

/// The auxiliary source families this engine reconciles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFamily {
    Chat,
    MeetingTranscript,
    TrackerHistory,
    Board,
    Wiki,
}

impl SourceFamily {
    /// The families the window resolver considers for reconciliation.
    pub const WINDOWED: &'static [SourceFamily] = &[
        SourceFamily::Chat,
        SourceFamily::MeetingTranscript,
        SourceFamily::TrackerHistory,
    ];

    /// Returns the display label for this family.
    pub fn label(&self) -> &'static str {
        match self {
            SourceFamily::Chat => "chat",
            SourceFamily::MeetingTranscript => "meeting_transcript",
            SourceFamily::TrackerHistory => "tracker_history",
            SourceFamily::Board => "board",
            SourceFamily::Wiki => "wiki",
        }
    }
}

impl fmt::Display for SourceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A closed time interval around an analysis timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimeWindow {
    /// Builds a symmetric window of `half_width_hours` around `center`.
    pub fn around(center: Timestamp, half_width_hours: i64) -> Self {
        Self {
            start: center.minus_hours(half_width_hours),
            end: center.plus_hours(half_width_hours),
        }
    }

    /// Whether the given instant falls inside this window (inclusive).
    pub fn contains(&self, ts: &Timestamp) -> bool {
        !ts.is_before(&self.start) && !ts.is_after(&self.end)
    }
}

/// Confidence formula parameters for one windowed source family.
///
/// `confidence = min(cap, base + per_item * matched_item_count)`, except that
/// a zero item count always yields zero confidence. The tracker formula is a
/// special case with `base = cap` and `per_item = 0` (fixed 0.95 when any
/// item exists).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FamilyConfidenceParams {
    pub base: f64,
    pub per_item: f64,
    pub cap: f64,
}

impl FamilyConfidenceParams {
    /// Computes the raw confidence for a matched item count.
    pub fn confidence_for(&self, item_count: usize) -> SourceConfidence {
        if item_count == 0 {
            return SourceConfidence::ZERO;
        }
        SourceConfidence::new((self.base + self.per_item * item_count as f64).min(self.cap))
    }
}

/// Per-family windowing policy: relevance half-window plus confidence
/// formula. Empirically chosen constants preserved for behavioral
/// compatibility; tunable through configuration, not re-derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowPolicy {
    pub chat_half_window_hours: i64,
    pub meeting_half_window_hours: i64,
    pub tracker_half_window_hours: i64,
    pub chat: FamilyConfidenceParams,
    pub meeting: FamilyConfidenceParams,
    pub tracker: FamilyConfidenceParams,
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self {
            chat_half_window_hours: 6,
            meeting_half_window_hours: 24,
            tracker_half_window_hours: 12,
            chat: FamilyConfidenceParams {
                base: 0.70,
                per_item: 0.05,
                cap: 0.95,
            },
            meeting: FamilyConfidenceParams {
                base: 0.65,
                per_item: 0.10,
                cap: 0.90,
            },
            tracker: FamilyConfidenceParams {
                base: 0.95,
                per_item: 0.0,
                cap: 0.95,
            },
        }
    }
}

impl WindowPolicy {
    /// Returns the relevance window for a family around the analysis time.
    ///
    /// Returns None for families without a relevance window (board, wiki).
    pub fn window_for(&self, family: SourceFamily, center: Timestamp) -> Option<TimeWindow> {
        let hours = match family {
            SourceFamily::Chat => self.chat_half_window_hours,
            SourceFamily::MeetingTranscript => self.meeting_half_window_hours,
            SourceFamily::TrackerHistory => self.tracker_half_window_hours,
            SourceFamily::Board | SourceFamily::Wiki => return None,
        };
        Some(TimeWindow::around(center, hours))
    }

    /// Computes the per-family confidence for a matched item count.
    pub fn confidence_for(&self, family: SourceFamily, item_count: usize) -> SourceConfidence {
        let params = match family {
            SourceFamily::Chat => &self.chat,
            SourceFamily::MeetingTranscript => &self.meeting,
            SourceFamily::TrackerHistory => &self.tracker,
            SourceFamily::Board | SourceFamily::Wiki => return SourceConfidence::ZERO,
        };
        params.confidence_for(item_count)
    }
}
