// Specgraph Service entry point
// Exposes the standards similarity-search endpoint: candidate lookup over
// the corpus, TF-IDF ranking, relationship graph construction and rendering
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use specgraph_service::api::{self, AppState};
use specgraph_service::store::PgDocumentStore;
use specgraph_service::AppConfig;

#[actix_web::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    dotenv::dotenv().ok();
    let config = AppConfig::from_env()?;

    info!("Starting Specgraph Service");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database ready");

    std::fs::create_dir_all(&config.artifact_dir)?;

    let state = AppState {
        store: Arc::new(PgDocumentStore::new(pool)),
        artifact_dir: config.artifact_dir.clone(),
    };

    let bind_addr = (config.host.clone(), config.service_port);
    info!("Listening on {}:{}", config.host, config.service_port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(web::Data::new(state.clone()))
            .configure(api::routes)
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
