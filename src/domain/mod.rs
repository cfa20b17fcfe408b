//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `catalog` - Externally supplied anti-pattern catalog types
//! - `sources` - Source window resolution and cross-source confidence fusion
//! - `detection` - Stratified pattern matching and weighted evidence
//! - `signals` - Statistical/temporal weak-signal detection and trend promotion
//! - `workspace_mode` - Single/multi-project mode scoring
//! - `event` - Analysis event record consumed from the upstream producer
//! - `report` - Reconciliation report returned to the caller

pub mod catalog;
pub mod detection;
pub mod event;
pub mod foundation;
pub mod report;
pub mod signals;
pub mod sources;
pub mod workspace_mode;
