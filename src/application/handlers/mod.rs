//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod detect_mode;
pub mod reconcile;
pub mod resolve_sources;

pub use detect_mode::{DetectWorkspaceModeHandler, DetectWorkspaceModeQuery};
pub use reconcile::{ReconcileAnalysisCommand, ReconcileAnalysisHandler};
pub use resolve_sources::{ResolveSourcesHandler, ResolveSourcesQuery, ResolvedSources};
