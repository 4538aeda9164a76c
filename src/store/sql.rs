// Postgres document store backed by sqlx
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use super::{DocumentStore, SectionFilters};
use crate::errors::SearchResult;
use crate::models::{ChangeRequest, Section, SpecVersion, Specification};

pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// clauses_affected lives in a JSONB column, so the CR row needs a private
// decode type before converting into the domain model.
#[derive(FromRow)]
struct CrRow {
    cr_id: String,
    cr_number: i32,
    cr_title: String,
    source_org: Option<String>,
    category: Option<String>,
    meeting_number: Option<String>,
    meeting_location: Option<String>,
    meeting_date: Option<NaiveDate>,
    clauses_affected: Json<Vec<String>>,
}

impl From<CrRow> for ChangeRequest {
    fn from(row: CrRow) -> Self {
        ChangeRequest {
            cr_id: row.cr_id,
            cr_number: row.cr_number,
            cr_title: row.cr_title,
            source_org: row.source_org,
            category: row.category,
            meeting_number: row.meeting_number,
            meeting_location: row.meeting_location,
            meeting_date: row.meeting_date,
            clauses_affected: row.clauses_affected.0,
        }
    }
}

#[derive(FromRow)]
struct SectionRow {
    section_id: String,
    section_number: String,
    section_title: String,
    section_content: String,
    version_id: String,
}

impl From<SectionRow> for Section {
    fn from(row: SectionRow) -> Self {
        Section {
            section_id: row.section_id,
            section_number: row.section_number,
            section_title: row.section_title,
            section_content: row.section_content,
            version_id: row.version_id,
        }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find_sections(&self, filters: &SectionFilters) -> SearchResult<Vec<Section>> {
        let rows: Vec<SectionRow> = sqlx::query_as(
            r#"
            SELECT s.section_id, s.section_number, s.section_title,
                   s.section_content, s.version_id
            FROM section_table s
            JOIN spec_version_table v ON v.version_id = s.version_id
            JOIN spec_table sp ON sp.spec_id = v.spec_id
            WHERE ($1::text IS NULL OR sp.spec_number = $1)
              AND ($2::text IS NULL OR v.version_number = $2)
              AND ($3::text IS NULL OR s.section_number = $3)
            ORDER BY s.section_id
            "#,
        )
        .bind(filters.spec_number.as_deref())
        .bind(filters.version_number.as_deref())
        .bind(filters.section_number.as_deref())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Section::from).collect())
    }

    async fn find_change_requests_affecting(
        &self,
        section_id: &str,
    ) -> SearchResult<Vec<ChangeRequest>> {
        // JSONB array containment, served by the GIN index on clauses_affected.
        let rows: Vec<CrRow> = sqlx::query_as(
            r#"
            SELECT cr_id, cr_number, cr_title, source_org, category,
                   meeting_number, meeting_location, meeting_date,
                   clauses_affected
            FROM cr_table
            WHERE clauses_affected @> to_jsonb(ARRAY[$1::text])
            ORDER BY cr_id
            "#,
        )
        .bind(section_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ChangeRequest::from).collect())
    }

    async fn find_version(&self, version_id: &str) -> SearchResult<Option<SpecVersion>> {
        let row = sqlx::query_as::<_, (String, String, Option<NaiveDate>, String)>(
            r#"
            SELECT version_id, version_number, release_date, spec_id
            FROM spec_version_table
            WHERE version_id = $1
            "#,
        )
        .bind(version_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(version_id, version_number, release_date, spec_id)| SpecVersion {
            version_id,
            version_number,
            release_date,
            spec_id,
        }))
    }

    async fn find_specification(&self, spec_id: &str) -> SearchResult<Option<Specification>> {
        let row = sqlx::query_as::<_, (String, String, String)>(
            r#"
            SELECT spec_id, spec_number, spec_title
            FROM spec_table
            WHERE spec_id = $1
            "#,
        )
        .bind(spec_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(spec_id, spec_number, spec_title)| Specification {
            spec_id,
            spec_number,
            spec_title,
        }))
    }
}
