//! CatalogStore port for the externally managed anti-pattern catalog.

use async_trait::async_trait;

use crate::domain::catalog::{CatalogFilter, PatternCatalogEntry};
use crate::domain::foundation::DomainError;

/// Read-only access to the active anti-pattern catalog.
///
/// Fails with `CatalogUnavailable` when the backing store is unreachable;
/// callers degrade to "no detections" rather than aborting the whole
/// reconciliation.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Lists active catalog entries matching the filter.
    async fn list_active(
        &self,
        filter: &CatalogFilter,
    ) -> Result<Vec<PatternCatalogEntry>, DomainError>;
}
