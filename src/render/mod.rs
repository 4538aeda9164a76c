//! Graph renderer.
//!
//! Lays the relationship graph out with a small force-directed simulation
//! (pairwise repulsion, spring attraction along edges, center gravity) and
//! draws it onto a fixed-size SVG canvas: uniform circles, centered node
//! labels and mid-edge relationship labels. Layout is deterministic for a
//! given graph because the initial positions come from a seeded RNG.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::search::RelationGraph;

const CANVAS: f64 = 1000.0;
const NODE_RADIUS: f64 = 32.0;
const ITERATIONS: usize = 150;
const REPULSION: f64 = 40_000.0;
const SPRING_LENGTH: f64 = 220.0;
const SPRING_STRENGTH: f64 = 0.05;
const GRAVITY: f64 = 0.02;
const MAX_STEP: f64 = 12.0;
const LAYOUT_SEED: u64 = 0x5eed_6_4a9;

#[derive(Debug, Clone, Copy)]
struct Point {
    x: f64,
    y: f64,
}

/// Force-directed positions for every node, indexed like `graph.nodes()`.
fn layout(graph: &RelationGraph) -> Vec<Point> {
    let n = graph.node_count();
    let mut rng = StdRng::seed_from_u64(LAYOUT_SEED);
    let mut positions: Vec<Point> = (0..n)
        .map(|_| Point {
            x: rng.gen_range(CANVAS * 0.2..CANVAS * 0.8),
            y: rng.gen_range(CANVAS * 0.2..CANVAS * 0.8),
        })
        .collect();

    for _ in 0..ITERATIONS {
        let mut forces = vec![Point { x: 0.0, y: 0.0 }; n];

        // Repulsion between every node pair
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = positions[i].x - positions[j].x;
                let dy = positions[i].y - positions[j].y;
                let dist_sq = dx * dx + dy * dy + 0.1;
                let force = REPULSION / dist_sq;
                let fx = dx * force / dist_sq.sqrt();
                let fy = dy * force / dist_sq.sqrt();
                forces[i].x += fx;
                forces[i].y += fy;
                forces[j].x -= fx;
                forces[j].y -= fy;
            }
        }

        // Spring attraction along edges
        for edge in graph.edges() {
            let (src, tgt) = (edge.source, edge.target);
            let dx = positions[tgt].x - positions[src].x;
            let dy = positions[tgt].y - positions[src].y;
            let dist = (dx * dx + dy * dy).sqrt().max(1.0);
            let force = (dist - SPRING_LENGTH) * SPRING_STRENGTH;
            let fx = (dx / dist) * force;
            let fy = (dy / dist) * force;
            forces[src].x += fx;
            forces[src].y += fy;
            forces[tgt].x -= fx;
            forces[tgt].y -= fy;
        }

        // Apply with step clamp and center gravity
        for i in 0..n {
            positions[i].x += forces[i].x.clamp(-MAX_STEP, MAX_STEP);
            positions[i].y += forces[i].y.clamp(-MAX_STEP, MAX_STEP);
            positions[i].x += (CANVAS / 2.0 - positions[i].x) * GRAVITY;
            positions[i].y += (CANVAS / 2.0 - positions[i].y) * GRAVITY;
            positions[i].x = positions[i].x.clamp(NODE_RADIUS, CANVAS - NODE_RADIUS);
            positions[i].y = positions[i].y.clamp(NODE_RADIUS, CANVAS - NODE_RADIUS);
        }
    }

    positions
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the graph to an SVG document. Pure; no filesystem access.
pub fn to_svg(graph: &RelationGraph) -> String {
    let positions = layout(graph);
    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg width="{c}" height="{c}" viewBox="0 0 {c} {c}" xmlns="http://www.w3.org/2000/svg" style="background-color: #ffffff;">"#,
        c = CANVAS
    ));

    // Edges under nodes, labels at the midpoint
    for edge in graph.edges() {
        let a = positions[edge.source];
        let b = positions[edge.target];
        // Query->section edges get a weight-scaled stroke
        let stroke = 1.0 + edge.weight.unwrap_or(0.0) * 2.0;
        svg.push_str(&format!(
            r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#64748b" stroke-width="{:.1}"/>"##,
            a.x, a.y, b.x, b.y, stroke
        ));
        svg.push_str(&format!(
            r##"<text x="{:.1}" y="{:.1}" font-size="13" fill="#475569" text-anchor="middle">{}</text>"##,
            (a.x + b.x) / 2.0,
            (a.y + b.y) / 2.0 - 4.0,
            escape_xml(&edge.label)
        ));
    }

    for (node, pos) in graph.nodes().iter().zip(&positions) {
        svg.push_str(&format!(
            r##"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="#bfdbfe" stroke="#1e3a8a" stroke-width="1.5"/>"##,
            pos.x, pos.y, NODE_RADIUS
        ));
        svg.push_str(&format!(
            r##"<text x="{:.1}" y="{:.1}" font-size="15" font-weight="bold" fill="#0f172a" text-anchor="middle">{}</text>"##,
            pos.x,
            pos.y + 5.0,
            escape_xml(&node.label)
        ));
    }

    svg.push_str("</svg>");
    svg
}

/// Persist a rendered image under a per-request unique name.
///
/// Returns the artifact path after confirming the file exists, so a failed
/// write surfaces as an error rather than a dangling path. Unique names keep
/// concurrent requests from racing on a shared file.
pub fn write_artifact(dir: &Path, svg: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("graph-{}.svg", Uuid::new_v4()));
    fs::write(&path, svg.as_bytes())?;
    if !path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            "graph image missing after write",
        ));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> RelationGraph {
        let mut graph = RelationGraph::new();
        let query = graph.add_node("query", "paging & <reachability>");
        let section = graph.add_node("section:s1", "5.6.1");
        let cr = graph.add_node("cr:cr-1", "CR 42");
        graph.add_edge(query, section, "0.91", Some(0.91));
        graph.add_edge(section, cr, "affects", None);
        graph
    }

    #[test]
    fn svg_contains_every_node_and_edge_label() {
        let svg = to_svg(&sample_graph());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("5.6.1"));
        assert!(svg.contains("CR 42"));
        assert!(svg.contains("0.91"));
        assert!(svg.contains("affects"));
        assert_eq!(svg.matches("<circle").count(), 3);
        assert_eq!(svg.matches("<line").count(), 2);
    }

    #[test]
    fn labels_are_xml_escaped() {
        let svg = to_svg(&sample_graph());
        assert!(svg.contains("paging &amp; &lt;reachability&gt;"));
        assert!(!svg.contains("<reachability>"));
    }

    #[test]
    fn layout_keeps_nodes_on_canvas() {
        let mut graph = RelationGraph::new();
        let hub = graph.add_node("query", "q");
        for i in 0..12 {
            let n = graph.add_node(format!("section:{i}"), format!("{i}"));
            graph.add_edge(hub, n, "0.50", Some(0.5));
        }

        for pos in layout(&graph) {
            assert!(pos.x >= NODE_RADIUS && pos.x <= CANVAS - NODE_RADIUS);
            assert!(pos.y >= NODE_RADIUS && pos.y <= CANVAS - NODE_RADIUS);
        }
    }

    #[test]
    fn single_node_graph_renders() {
        let mut graph = RelationGraph::new();
        graph.add_node("query", "lonely");
        let svg = to_svg(&graph);
        assert_eq!(svg.matches("<circle").count(), 1);
        assert!(svg.contains("lonely"));
    }

    #[test]
    fn artifacts_get_unique_paths() {
        let dir = tempfile::tempdir().unwrap();
        let svg = to_svg(&sample_graph());

        let first = write_artifact(dir.path(), &svg).unwrap();
        let second = write_artifact(dir.path(), &svg).unwrap();

        assert!(first.exists());
        assert!(second.exists());
        assert_ne!(first, second);
        assert_eq!(std::fs::read_to_string(&first).unwrap(), svg);
    }
}
