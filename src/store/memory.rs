// In-memory document store
//
// Backs the test suite and offline runs with the same read-only contract
// the Postgres store exposes.
use async_trait::async_trait;

use super::{DocumentStore, SectionFilters};
use crate::errors::SearchResult;
use crate::models::{ChangeRequest, Section, SpecVersion, Specification};

#[derive(Default)]
pub struct InMemoryDocumentStore {
    specifications: Vec<Specification>,
    versions: Vec<SpecVersion>,
    sections: Vec<Section>,
    change_requests: Vec<ChangeRequest>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_specification(&mut self, spec: Specification) -> &mut Self {
        self.specifications.push(spec);
        self
    }

    pub fn add_version(&mut self, version: SpecVersion) -> &mut Self {
        self.versions.push(version);
        self
    }

    pub fn add_section(&mut self, section: Section) -> &mut Self {
        self.sections.push(section);
        self
    }

    pub fn add_change_request(&mut self, cr: ChangeRequest) -> &mut Self {
        self.change_requests.push(cr);
        self
    }

    fn version_of(&self, section: &Section) -> Option<&SpecVersion> {
        self.versions.iter().find(|v| v.version_id == section.version_id)
    }

    fn spec_of(&self, version: &SpecVersion) -> Option<&Specification> {
        self.specifications.iter().find(|s| s.spec_id == version.spec_id)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn find_sections(&self, filters: &SectionFilters) -> SearchResult<Vec<Section>> {
        let matches = self
            .sections
            .iter()
            .filter(|section| {
                if let Some(number) = &filters.section_number {
                    if &section.section_number != number {
                        return false;
                    }
                }
                if filters.version_number.is_none() && filters.spec_number.is_none() {
                    return true;
                }
                let Some(version) = self.version_of(section) else {
                    return false;
                };
                if let Some(number) = &filters.version_number {
                    if &version.version_number != number {
                        return false;
                    }
                }
                if let Some(number) = &filters.spec_number {
                    match self.spec_of(version) {
                        Some(spec) if &spec.spec_number == number => {}
                        _ => return false,
                    }
                }
                true
            })
            .cloned()
            .collect();

        Ok(matches)
    }

    async fn find_change_requests_affecting(
        &self,
        section_id: &str,
    ) -> SearchResult<Vec<ChangeRequest>> {
        Ok(self
            .change_requests
            .iter()
            .filter(|cr| cr.clauses_affected.iter().any(|c| c == section_id))
            .cloned()
            .collect())
    }

    async fn find_version(&self, version_id: &str) -> SearchResult<Option<SpecVersion>> {
        Ok(self
            .versions
            .iter()
            .find(|v| v.version_id == version_id)
            .cloned())
    }

    async fn find_specification(&self, spec_id: &str) -> SearchResult<Option<Specification>> {
        Ok(self
            .specifications
            .iter()
            .find(|s| s.spec_id == spec_id)
            .cloned())
    }
}
