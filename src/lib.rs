// Specgraph Service - similarity search over 3GPP standards documents
// Ranks stored sections against a free-text query and renders the
// relationship graph linking matches to their change requests, meetings,
// source organizations and parent specifications

pub mod api;
pub mod config;
pub mod errors;
pub mod models;
pub mod render;
pub mod search;
pub mod store;

pub use config::AppConfig;
pub use errors::{SearchError, SearchResult};
pub use store::DocumentStore;
