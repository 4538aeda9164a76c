// Service configuration
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub service_port: u16,

    // Postgres connection string for the standards corpus
    pub database_url: String,

    // Directory where rendered graph images are written
    pub artifact_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            service_port: std::env::var("SERVICE_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()?,
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/standards_db".to_string()),
            artifact_dir: std::env::var("ARTIFACT_DIR")
                .unwrap_or_else(|_| "artifacts".to_string())
                .into(),
        })
    }
}
