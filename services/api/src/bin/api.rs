//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{FileIssueStore, GeminiAdapter, PgIssueStore},
    config::Config,
    error::ApiError,
    web::{build_router, state::AppState},
};
use newsroom_core::ports::IssueRepository;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Choose the Issue Store ---
    let issues: Arc<dyn IssueRepository> = match &config.database_url {
        Some(database_url) => {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;
            let store = PgIssueStore::new(db_pool);
            info!("Running database migrations...");
            store.run_migrations().await?;
            info!("Database migrations complete.");
            Arc::new(store)
        }
        None => {
            info!(path = %config.data_file.display(), "Using JSON file issue store");
            Arc::new(FileIssueStore::new(config.data_file.clone()))
        }
    };

    let stored = issues.list().await?;
    info!(count = stored.len(), "Issue store ready");

    // --- 3. Initialize the Generation Adapter ---
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; generation requests will fail until it is configured");
    }
    let generator = Arc::new(GeminiAdapter::new(&config));

    // --- 4. Build the Shared AppState and Router ---
    let app_state = Arc::new(AppState {
        config: config.clone(),
        generator,
        issues,
    });
    let app = build_router(app_state);

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "OpenAPI document available at http://{}/api-docs/openapi.json",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
