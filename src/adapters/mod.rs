//! Adapters - Implementations of port interfaces.
//!
//! - `memory` - In-memory implementations for tests and local development.

pub mod memory;

pub use memory::{
    InMemoryAnalysisStore, InMemoryCatalogStore, InMemoryDetectionStore, InMemoryHistoryStore,
    InMemorySourceMappingStore, InMemoryTrendStore, InMemoryWeakSignalStore, ScriptedClassifier,
};
