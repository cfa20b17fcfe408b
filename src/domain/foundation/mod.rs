//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary of the reconciliation domain.

mod confidence;
mod errors;
mod ids;
mod timestamp;

pub use confidence::{
    DetectionScore, DetectionTier, SourceConfidence, CANONICAL_FLOOR, EMERGING_FLOOR,
    WEAK_SIGNAL_FLOOR,
};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ActorId, AnalysisId, DetectionId, SignalId, TrendId, WorkspaceId};
pub use timestamp::Timestamp;
