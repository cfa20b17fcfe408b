//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Handlers never fail the whole run on a collaborator outage; they degrade
//! and report warnings.

pub mod handlers;

pub use handlers::{
    DetectWorkspaceModeHandler, DetectWorkspaceModeQuery, ReconcileAnalysisCommand,
    ReconcileAnalysisHandler, ResolveSourcesHandler, ResolveSourcesQuery, ResolvedSources,
};
