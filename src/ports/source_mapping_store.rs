//! SourceMappingStore port for workspace-to-source mappings.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, WorkspaceId};
use crate::domain::sources::SourceFamily;

/// One auxiliary source explicitly mapped to a workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMapping {
    pub workspace_id: WorkspaceId,
    pub source_kind: SourceFamily,
    /// Opaque reference into the external integration (channel id, calendar
    /// id, project key).
    pub external_ref: String,
}

/// Resolves which auxiliary sources are mapped to a workspace.
///
/// Only explicitly mapped sources are considered for reconciliation.
#[async_trait]
pub trait SourceMappingStore: Send + Sync {
    /// Returns the mappings for one source family in a workspace.
    async fn resolve_mappings(
        &self,
        workspace_id: &WorkspaceId,
        family: SourceFamily,
    ) -> Result<Vec<SourceMapping>, DomainError>;
}
