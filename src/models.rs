//! Domain entities of the standards corpus.
//!
//! All four entities are owned and mutated by the external store; this
//! service only reads them. A `ChangeRequest` is not linked to sections by
//! foreign key: the relationship is inferred from membership of a section id
//! in its `clauses_affected` set.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A named technical standard document, versioned over time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specification {
    pub spec_id: String,
    pub spec_number: String,
    pub spec_title: String,
}

/// One dated revision of a [`Specification`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecVersion {
    pub version_id: String,
    pub version_number: String,
    pub release_date: Option<NaiveDate>,
    pub spec_id: String,
}

/// A titled, numbered clause of text within a specific spec version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub section_id: String,
    pub section_number: String,
    pub section_title: String,
    pub section_content: String,
    pub version_id: String,
}

/// A proposed modification to one or more sections, tracked with the
/// meeting and working-group metadata 3GPP records for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRequest {
    pub cr_id: String,
    pub cr_number: i32,
    pub cr_title: String,
    pub source_org: Option<String>,
    pub category: Option<String>,
    pub meeting_number: Option<String>,
    pub meeting_location: Option<String>,
    pub meeting_date: Option<NaiveDate>,
    /// Section ids this CR touches. Matching is exact set membership.
    pub clauses_affected: Vec<String>,
}
