// End-to-end search scenarios over the in-memory store
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};

use specgraph_service::api::{routes, AppState};
use specgraph_service::models::{ChangeRequest, Section, SpecVersion, Specification};
use specgraph_service::store::InMemoryDocumentStore;

fn corpus() -> InMemoryDocumentStore {
    let mut store = InMemoryDocumentStore::new();
    store
        .add_specification(Specification {
            spec_id: "spec-1".into(),
            spec_number: "TS 23.501".into(),
            spec_title: "System architecture for the 5G System".into(),
        })
        .add_version(SpecVersion {
            version_id: "ver-1".into(),
            version_number: "17.5.0".into(),
            release_date: None,
            spec_id: "spec-1".into(),
        })
        .add_section(Section {
            section_id: "sec-1".into(),
            section_number: "5.15".into(),
            section_title: "Network slicing".into(),
            section_content: "network slice selection assistance information".into(),
            version_id: "ver-1".into(),
        })
        .add_section(Section {
            section_id: "sec-2".into(),
            section_number: "5.16".into(),
            section_title: "Paging".into(),
            section_content: "paging occasion monitoring and drx cycles".into(),
            version_id: "ver-1".into(),
        })
        .add_section(Section {
            section_id: "sec-3".into(),
            section_number: "5.17".into(),
            section_title: "QoS".into(),
            section_content: "qos flow binding and packet filters".into(),
            version_id: "ver-1".into(),
        });
    store
}

async fn call(
    store: InMemoryDocumentStore,
    body: serde_json::Value,
) -> (StatusCode, Option<String>, Vec<u8>) {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState {
        store: Arc::new(store),
        artifact_dir: dir.path().to_path_buf(),
    };
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/search")
        .set_json(&body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let content_type = resp
        .headers()
        .get("content-type")
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = test::read_body(resp).await.to_vec();
    (status, content_type, bytes)
}

#[actix_web::test]
async fn exact_match_query_returns_graph_image() {
    let (status, content_type, body) = call(
        corpus(),
        serde_json::json!({
            "query": "network slice selection assistance information"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("image/svg+xml"));
    let svg = String::from_utf8(body).unwrap();
    // The exactly-matching section scores 1.0 and tops the ranking
    assert!(svg.contains("1.00"));
    assert!(svg.contains("5.15"));
}

#[actix_web::test]
async fn unmatched_filters_signal_no_matching_records() {
    let (status, _, body) = call(
        corpus(),
        serde_json::json!({
            "query": "anything",
            "spec_number": "TS 38.331"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let msg: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(msg["message"], "No matching records found.");
}

#[actix_web::test]
async fn empty_query_is_rejected() {
    let (status, _, body) = call(corpus(), serde_json::json!({ "query": "   " })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let msg: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(msg["message"], "Query cannot be empty");
}

#[actix_web::test]
async fn cr_expansion_shapes_the_graph() {
    // One matched section with two affecting CRs, one discussed at a meeting
    let mut store = corpus();
    store
        .add_change_request(ChangeRequest {
            cr_id: "cr-1".into(),
            cr_number: 101,
            cr_title: "Slice selection fix".into(),
            source_org: Some("Ericsson".into()),
            category: None,
            meeting_number: Some("SA2-152".into()),
            meeting_location: None,
            meeting_date: None,
            clauses_affected: vec!["sec-1".into()],
        })
        .add_change_request(ChangeRequest {
            cr_id: "cr-2".into(),
            cr_number: 102,
            cr_title: "Editorial".into(),
            source_org: None,
            category: None,
            meeting_number: None,
            meeting_location: None,
            meeting_date: None,
            clauses_affected: vec!["sec-1".into()],
        });

    let (status, content_type, body) = call(
        store,
        serde_json::json!({
            "query": "network slice selection",
            "section_number": "5.15",
            "format": "json"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("application/json"));

    let graph: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let nodes = graph["nodes"].as_array().unwrap();
    let links = graph["links"].as_array().unwrap();

    // query + section + 2 CRs + meeting + org + spec
    assert_eq!(nodes.len(), 7);
    let label_of = |id: &str| {
        nodes
            .iter()
            .find(|n| n["id"] == id)
            .map(|n| n["label"].as_str().unwrap().to_string())
    };
    assert_eq!(label_of("cr:cr-1").unwrap(), "CR 101");
    assert_eq!(label_of("meeting:SA2-152").unwrap(), "Meeting SA2-152");
    assert_eq!(label_of("spec:spec-1").unwrap(), "TS 23.501");

    let count = |label: &str| links.iter().filter(|l| l["label"] == label).count();
    assert_eq!(count("affects"), 2);
    assert_eq!(count("discussed at"), 1);
    assert_eq!(count("created by"), 1);
    assert_eq!(count("part of"), 1);
}

#[actix_web::test]
async fn at_most_five_sections_are_ranked() {
    let mut store = InMemoryDocumentStore::new();
    for i in 0..8 {
        store.add_section(Section {
            section_id: format!("sec-{i}"),
            section_number: format!("4.{i}"),
            section_title: String::new(),
            section_content: format!("registration management state {i}"),
            version_id: "ver-x".into(),
        });
    }

    let (status, _, body) = call(
        store,
        serde_json::json!({ "query": "registration management", "format": "json" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let graph: serde_json::Value = serde_json::from_slice(&body).unwrap();
    // query node plus the five ranked sections; missing versions never fail
    assert_eq!(graph["nodes"].as_array().unwrap().len(), 6);
    assert_eq!(graph["links"].as_array().unwrap().len(), 5);
}
