//! Relationship graph construction.
//!
//! Expands the ranked sections of one request into a labeled graph: the
//! query at the center, a similarity-weighted edge to every matched section,
//! and the change requests, meetings, source organizations and parent
//! specifications reachable from those sections.
//!
//! Node keys are namespaced by entity kind (`section:<id>`, `cr:<id>`,
//! `meeting:<n>`, `org:<name>`, `spec:<id>`), so identifiers from different
//! entity types can never collide and silently merge into one node.

use std::collections::HashMap;

use serde_json::json;

use super::ranker::RankedSection;
use crate::errors::SearchResult;
use crate::store::DocumentStore;

/// Key of the node representing the query itself.
pub const QUERY_NODE: &str = "query";

#[derive(Debug, Clone)]
pub struct GraphNode {
    /// Unique key within one graph instance.
    pub key: String,
    /// Display label drawn by the renderer.
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct GraphEdge {
    /// Index into [`RelationGraph::nodes`].
    pub source: usize,
    pub target: usize,
    pub label: String,
    /// Similarity weight, set on query→section edges only.
    pub weight: Option<f64>,
}

/// Request-scoped node/edge structure, discarded after rendering.
///
/// Nodes are deduplicated by key; edges are not, so repeated relationships
/// produce repeated edges.
#[derive(Debug, Default)]
pub struct RelationGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    index: HashMap<String, usize>,
}

impl RelationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, or return the existing index if the key is present.
    /// The label of an existing node is left untouched.
    pub fn add_node(&mut self, key: impl Into<String>, label: impl Into<String>) -> usize {
        let key = key.into();
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(GraphNode {
            key: key.clone(),
            label: label.into(),
        });
        self.index.insert(key, idx);
        idx
    }

    pub fn add_edge(
        &mut self,
        source: usize,
        target: usize,
        label: impl Into<String>,
        weight: Option<f64>,
    ) {
        self.edges.push(GraphEdge {
            source,
            target,
            label: label.into(),
            weight,
        });
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node_index(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Node-link representation for JSON responses, edges referencing node
    /// keys rather than indices.
    pub fn to_node_link(&self) -> serde_json::Value {
        json!({
            "nodes": self.nodes.iter().map(|n| json!({
                "id": n.key,
                "label": n.label,
            })).collect::<Vec<_>>(),
            "links": self.edges.iter().map(|e| {
                let mut link = json!({
                    "source": self.nodes[e.source].key,
                    "target": self.nodes[e.target].key,
                    "label": e.label,
                });
                if let Some(weight) = e.weight {
                    link["weight"] = json!(weight);
                }
                link
            }).collect::<Vec<_>>(),
        })
    }
}

/// Build the relationship graph for one request.
///
/// Missing version or specification rows omit the "part of" edge without
/// raising; store failures propagate.
pub async fn build_graph(
    query: &str,
    ranked: &[RankedSection],
    store: &dyn DocumentStore,
) -> SearchResult<RelationGraph> {
    let mut graph = RelationGraph::new();
    let query_node = graph.add_node(QUERY_NODE, query);

    for entry in ranked {
        let section = &entry.section;
        let section_node = graph.add_node(
            format!("section:{}", section.section_id),
            section.section_number.clone(),
        );
        graph.add_edge(
            query_node,
            section_node,
            format!("{:.2}", entry.score),
            Some(entry.score),
        );

        for cr in store
            .find_change_requests_affecting(&section.section_id)
            .await?
        {
            let cr_node = graph.add_node(
                format!("cr:{}", cr.cr_id),
                format!("CR {}", cr.cr_number),
            );
            graph.add_edge(section_node, cr_node, "affects", None);

            if let Some(meeting) = &cr.meeting_number {
                let meeting_node = graph.add_node(
                    format!("meeting:{meeting}"),
                    format!("Meeting {meeting}"),
                );
                graph.add_edge(cr_node, meeting_node, "discussed at", None);
            }

            if let Some(org) = &cr.source_org {
                let org_node = graph.add_node(format!("org:{org}"), org.clone());
                graph.add_edge(cr_node, org_node, "created by", None);
            }
        }

        if let Some(version) = store.find_version(&section.version_id).await? {
            if let Some(spec) = store.find_specification(&version.spec_id).await? {
                let spec_node =
                    graph.add_node(format!("spec:{}", spec.spec_id), spec.spec_number.clone());
                graph.add_edge(section_node, spec_node, "part of", None);
            }
        }
    }

    Ok(graph)
}
