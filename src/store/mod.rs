// Document Store Adapter - read-only access to the standards corpus
pub mod memory;
pub mod sql;

use crate::errors::SearchResult;
use crate::models::{ChangeRequest, Section, SpecVersion, Specification};
use async_trait::async_trait;

pub use memory::InMemoryDocumentStore;
pub use sql::PgDocumentStore;

/// Optional filters narrowing the candidate set for one search request.
#[derive(Debug, Clone, Default)]
pub struct SectionFilters {
    pub spec_number: Option<String>,
    pub version_number: Option<String>,
    pub section_number: Option<String>,
}

/// Read-only repository over specifications, versions, sections and CRs.
///
/// The core ranking and graph logic depends only on this trait, never on a
/// concrete storage technology. All lookups are side-effect free; a missing
/// row is `Ok(None)` / an empty vec, never an error.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Sections matching the request filters, the candidate set for ranking.
    async fn find_sections(&self, filters: &SectionFilters) -> SearchResult<Vec<Section>>;

    /// Change requests whose affected-clauses set contains `section_id`.
    /// Membership is exact: a CR affecting "6.1.1" does not match "6.1".
    async fn find_change_requests_affecting(
        &self,
        section_id: &str,
    ) -> SearchResult<Vec<ChangeRequest>>;

    async fn find_version(&self, version_id: &str) -> SearchResult<Option<SpecVersion>>;

    async fn find_specification(&self, spec_id: &str) -> SearchResult<Option<Specification>>;
}
