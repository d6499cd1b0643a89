pub mod generate;
pub mod issues;
pub mod protocol;
pub mod rest;
pub mod state;

use crate::web::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

/// Issues carry inline base64 images, so bodies are allowed to be large.
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Builds the complete router: generation proxy, issue archive, health and OpenAPI.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    let cors = match app_state.config.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([CONTENT_TYPE, ACCEPT]),
        Err(e) => {
            warn!("Ignoring invalid CORS origin: {}", e);
            CorsLayer::new()
        }
    };

    let api_routes = Router::new()
        .route("/api/generate/content", post(generate::generate_content_handler))
        .route("/api/generate/image", post(generate::generate_image_handler))
        .route("/api/generate/rewrite", post(generate::rewrite_handler))
        .route(
            "/api/issues",
            get(issues::list_issues_handler).post(issues::save_issue_handler),
        )
        .route("/api/issues/latest", get(issues::latest_issue_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(app_state);

    Router::new()
        .route("/health", get(rest::health_handler))
        .route("/api-docs/openapi.json", get(rest::openapi_handler))
        .merge(api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
