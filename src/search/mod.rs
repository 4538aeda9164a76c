// Similarity ranking and relationship graph construction
pub mod graph;
pub mod ranker;

pub use graph::{build_graph, GraphEdge, GraphNode, RelationGraph};
pub use ranker::{rank, RankedSection, MAX_RESULTS};
