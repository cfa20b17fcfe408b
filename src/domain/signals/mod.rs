//! Statistical/temporal weak-signal detection and trend promotion.

mod detector;
pub mod statistics;
mod trends;
mod weak_signal;

pub use detector::{DetectorPolicy, DriftObservation, SignalDetector};
pub use trends::{EmergingTrend, TrendPromotion, TrendStatus, PROMOTION_MIN_SIGNALS};
pub use weak_signal::{SignalStatus, SignalType, WeakSignal};
