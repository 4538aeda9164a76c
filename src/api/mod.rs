// HTTP API
pub mod search;

pub use search::{routes, AppState, QueryRequest};
