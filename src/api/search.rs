//! Search endpoint.
//!
//! One request runs the whole pipeline sequentially: candidate lookup,
//! similarity ranking, relationship graph construction, rendering. The
//! not-found signals short-circuit before any graph work begins.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::{error, info};

use crate::errors::{SearchError, SearchResult};
use crate::render;
use crate::search::{build_graph, rank};
use crate::store::{DocumentStore, SectionFilters};

/// Search request body. Filters are optional and combine conjunctively.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    pub spec_number: Option<String>,
    pub version_number: Option<String>,
    pub section_number: Option<String>,
    /// "image" (default) or "json" for the node-link graph data.
    pub format: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub artifact_dir: PathBuf,
}

async fn search(
    state: web::Data<AppState>,
    req: web::Json<QueryRequest>,
) -> SearchResult<HttpResponse> {
    let start = Instant::now();
    let req = req.into_inner();

    if req.query.trim().is_empty() {
        return Err(SearchError::InvalidQuery);
    }

    info!(
        query = %req.query,
        spec_number = ?req.spec_number,
        version_number = ?req.version_number,
        section_number = ?req.section_number,
        "search request"
    );

    let filters = SectionFilters {
        spec_number: req.spec_number,
        version_number: req.version_number,
        section_number: req.section_number,
    };

    let candidates = state.store.find_sections(&filters).await?;
    if candidates.is_empty() {
        return Err(SearchError::NoMatchingRecords);
    }

    let ranked = rank(&req.query, candidates);
    // Defensive: the ranker returns at least one result for non-empty input.
    if ranked.is_empty() {
        return Err(SearchError::NoSimilarDocuments);
    }

    let graph = build_graph(&req.query, &ranked, state.store.as_ref()).await?;

    if req.format.as_deref() == Some("json") {
        info!(
            results = ranked.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "search completed (json)"
        );
        return Ok(HttpResponse::Ok().json(graph.to_node_link()));
    }

    let svg = render::to_svg(&graph);
    let artifact = render::write_artifact(&state.artifact_dir, &svg).map_err(|e| {
        error!("graph image generation failed: {e}");
        SearchError::Render(e.to_string())
    })?;

    info!(
        results = ranked.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        artifact = %artifact.display(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "search completed"
    );

    Ok(HttpResponse::Ok()
        .content_type("image/svg+xml")
        .body(svg))
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "specgraph-service",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Mount the service routes.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/search", web::post().to(search))
        .route("/health", web::get().to(health));
}
