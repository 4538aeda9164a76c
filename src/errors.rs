// Service error types
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

pub type SearchResult<T> = Result<T, SearchError>;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Query cannot be empty")]
    InvalidQuery,

    #[error("No matching records found.")]
    NoMatchingRecords,

    #[error("No similar documents found.")]
    NoSimilarDocuments,

    #[error("Failed to generate graph image: {0}")]
    Render(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ResponseError for SearchError {
    fn status_code(&self) -> StatusCode {
        match self {
            SearchError::InvalidQuery => StatusCode::BAD_REQUEST,
            SearchError::NoMatchingRecords | SearchError::NoSimilarDocuments => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "message": self.to_string(),
        }))
    }
}
