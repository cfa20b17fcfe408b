//! Ports - Interfaces for external collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! Reads (`CatalogStore`, `SourceMappingStore`, `HistoryStore`,
//! `AnalysisStore`, `Classifier`) feed the pipeline; writes
//! (`DetectionStore`, `WeakSignalStore`, `TrendStore`) accept only derived
//! types, keeping raw personal content out of persistence.

mod analysis_store;
mod catalog_store;
mod classifier;
mod detection_store;
mod history_store;
mod source_mapping_store;

pub use analysis_store::AnalysisStore;
pub use catalog_store::CatalogStore;
pub use classifier::{Classification, Classifier, DriftReport};
pub use detection_store::{DetectionStore, TrendStore, WeakSignalStore};
pub use history_store::{HistoryStore, RawItem};
pub use source_mapping_store::{SourceMapping, SourceMappingStore};
