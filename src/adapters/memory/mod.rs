//! In-memory adapters for testing and local development.
//!
//! Deterministic, lock-based implementations of every port. They support
//! error injection for resilience tests and capture writes for assertions.
//!
//! # Security Note
//!
//! These adapters are for **testing only** and should not be used in
//! production. They use `.expect()` on lock operations which will panic if
//! locks are poisoned.

mod analysis;
mod catalog;
mod classifier;
mod sources;
mod stores;

pub use analysis::InMemoryAnalysisStore;
pub use catalog::InMemoryCatalogStore;
pub use classifier::ScriptedClassifier;
pub use sources::{InMemoryHistoryStore, InMemorySourceMappingStore};
pub use stores::{InMemoryDetectionStore, InMemoryTrendStore, InMemoryWeakSignalStore};
