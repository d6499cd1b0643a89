//! services/api/src/web/rest.rs
//!
//! Contains the service-level REST handlers and the master definition for the
//! OpenAPI specification.

use crate::web::protocol::{
    GenerateContentBody, GenerateContentResponse, GenerateImageBody, GenerateImageResponse,
    HealthResponse, IssueListResponse, LatestIssueResponse, RewriteBody, RewriteResponse,
    SaveIssueResponse,
};
use crate::web::{generate, issues};
use axum::response::{IntoResponse, Json};
use newsroom_core::domain::{
    FrontPage, GeneratedContent, IssueStatus, NewsIssueDraft, PublicationType, SecondPage, Section,
    ThemeType,
};
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        generate::generate_content_handler,
        generate::generate_image_handler,
        generate::rewrite_handler,
        issues::list_issues_handler,
        issues::save_issue_handler,
        issues::latest_issue_handler,
    ),
    components(
        schemas(
            GenerateContentBody, GenerateContentResponse, GenerateImageBody, GenerateImageResponse,
            RewriteBody, RewriteResponse, IssueListResponse, SaveIssueResponse, LatestIssueResponse,
            HealthResponse, GeneratedContent, NewsIssueDraft, FrontPage, SecondPage, Section,
            PublicationType, ThemeType, IssueStatus
        )
    ),
    tags(
        (name = "Newsroom API", description = "Generate, edit and archive themed newspaper issues.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Service Handlers
//=========================================================================================

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Serves the OpenAPI document built from `ApiDoc`.
pub async fn openapi_handler() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
