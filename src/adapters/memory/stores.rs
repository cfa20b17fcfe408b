//! In-memory persistence stores for derived artifacts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::detection::PatternDetection;
use crate::domain::foundation::{ActorId, DomainError, ErrorCode};
use crate::domain::signals::{EmergingTrend, SignalStatus, WeakSignal};
use crate::ports::{DetectionStore, TrendStore, WeakSignalStore};

/// In-memory [`DetectionStore`] with write capture.
#[derive(Default)]
pub struct InMemoryDetectionStore {
    created: RwLock<Vec<PatternDetection>>,
    failing: AtomicBool,
}

impl InMemoryDetectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn created(&self) -> Vec<PatternDetection> {
        self.created
            .read()
            .expect("InMemoryDetectionStore: lock poisoned")
            .clone()
    }
}

#[async_trait]
impl DetectionStore for InMemoryDetectionStore {
    async fn create(&self, detection: PatternDetection) -> Result<(), DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::DetectionWriteFailed,
                "detection store unavailable",
            ));
        }
        self.created
            .write()
            .expect("InMemoryDetectionStore: lock poisoned")
            .push(detection);
        Ok(())
    }
}

/// In-memory [`WeakSignalStore`] with write capture.
#[derive(Default)]
pub struct InMemoryWeakSignalStore {
    created: RwLock<Vec<WeakSignal>>,
    failing: AtomicBool,
}

impl InMemoryWeakSignalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn created(&self) -> Vec<WeakSignal> {
        self.created
            .read()
            .expect("InMemoryWeakSignalStore: lock poisoned")
            .clone()
    }
}

#[async_trait]
impl WeakSignalStore for InMemoryWeakSignalStore {
    async fn create(&self, signal: WeakSignal) -> Result<(), DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::SignalWriteFailed,
                "signal store unavailable",
            ));
        }
        self.created
            .write()
            .expect("InMemoryWeakSignalStore: lock poisoned")
            .push(signal);
        Ok(())
    }

    async fn list_active(&self, actor: &ActorId) -> Result<Vec<WeakSignal>, DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::SignalWriteFailed,
                "signal store unavailable",
            ));
        }
        Ok(self
            .created
            .read()
            .expect("InMemoryWeakSignalStore: lock poisoned")
            .iter()
            .filter(|s| &s.actor == actor && s.status == SignalStatus::Active)
            .cloned()
            .collect())
    }
}

/// In-memory [`TrendStore`] upserting by `(actor, signal_type)`.
#[derive(Default)]
pub struct InMemoryTrendStore {
    trends: RwLock<Vec<EmergingTrend>>,
    failing: AtomicBool,
}

impl InMemoryTrendStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn trends(&self) -> Vec<EmergingTrend> {
        self.trends
            .read()
            .expect("InMemoryTrendStore: lock poisoned")
            .clone()
    }
}

#[async_trait]
impl TrendStore for InMemoryTrendStore {
    async fn upsert(&self, trend: EmergingTrend) -> Result<(), DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::TrendWriteFailed,
                "trend store unavailable",
            ));
        }
        let mut trends = self
            .trends
            .write()
            .expect("InMemoryTrendStore: lock poisoned");
        match trends
            .iter_mut()
            .find(|t| t.actor == trend.actor && t.signal_type == trend.signal_type)
        {
            Some(existing) => *existing = trend,
            None => trends.push(trend),
        }
        Ok(())
    }
}
