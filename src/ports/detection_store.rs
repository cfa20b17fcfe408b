//! Persistence ports for derived detection artifacts.
//!
//! These ports form the privacy boundary: they accept only derived,
//! bounded types (detections, signals, trends), never raw source text.
//! Detections are append-only and deduplicated by `(analysis_id,
//! pattern_id)` downstream, so concurrent writers are tolerated.

use async_trait::async_trait;

use crate::domain::detection::PatternDetection;
use crate::domain::foundation::{ActorId, DomainError};
use crate::domain::signals::{EmergingTrend, WeakSignal};

/// Write access for pattern detections.
///
/// Writes are fire-and-forget per item: a single failure must not abort
/// the batch.
#[async_trait]
pub trait DetectionStore: Send + Sync {
    async fn create(&self, detection: PatternDetection) -> Result<(), DomainError>;
}

/// Weak-signal persistence.
///
/// Besides writes, exposes the active signals for an actor: trend
/// promotion considers signals accumulated across analysis cycles, not
/// just the current run's.
#[async_trait]
pub trait WeakSignalStore: Send + Sync {
    async fn create(&self, signal: WeakSignal) -> Result<(), DomainError>;

    /// Active (unconsumed) signals for an actor, oldest first.
    async fn list_active(&self, actor: &ActorId) -> Result<Vec<WeakSignal>, DomainError>;
}

/// Write access for emerging trends.
///
/// Upserts by `(actor, signal_type)` so recomputed trends never duplicate
/// rows.
#[async_trait]
pub trait TrendStore: Send + Sync {
    async fn upsert(&self, trend: EmergingTrend) -> Result<(), DomainError>;
}
