//! services/api/src/web/issues.rs
//!
//! Handlers for the issue archive.

use crate::web::protocol::{
    IssueListResponse, LatestIssueQuery, LatestIssueResponse, SaveIssueResponse,
};
use crate::web::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use newsroom_core::domain::{GeneratedContent, PublicationType};
use std::sync::Arc;
use tracing::{error, info};

/// List every stored issue in storage order.
#[utoipa::path(
    get,
    path = "/api/issues",
    responses(
        (status = 200, description = "All stored issues", body = IssueListResponse),
        (status = 500, description = "Issue store unreadable")
    )
)]
pub async fn list_issues_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let issues = app_state.issues.list().await.map_err(|e| {
        error!("Failed to list issues: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to list issues".to_string(),
        )
    })?;
    Ok(Json(IssueListResponse { issues }))
}

/// Save an issue. A known id updates that issue; otherwise a new one is created.
#[utoipa::path(
    post,
    path = "/api/issues",
    request_body = GeneratedContent,
    responses(
        (status = 200, description = "The stored issue, with its id and publication time", body = SaveIssueResponse),
        (status = 500, description = "Issue store unwritable")
    )
)]
pub async fn save_issue_handler(
    State(app_state): State<Arc<AppState>>,
    Json(content): Json<GeneratedContent>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let issue = app_state.issues.save(content).await.map_err(|e| {
        error!("Failed to save issue: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to save issue".to_string(),
        )
    })?;
    info!(id = ?issue.id, publication = %issue.publication_type, "Issue saved");
    Ok(Json(SaveIssueResponse {
        success: true,
        issue,
    }))
}

/// The most recently published issue, optionally for one publication.
#[utoipa::path(
    get,
    path = "/api/issues/latest",
    params(
        ("type" = Option<String>, Query, description = "Publication, e.g. TRIANGLE")
    ),
    responses(
        (status = 200, description = "Latest issue, or null when there is none", body = LatestIssueResponse),
        (status = 400, description = "Unknown publication"),
        (status = 500, description = "Issue store unreadable")
    )
)]
pub async fn latest_issue_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<LatestIssueQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let publication = query
        .publication
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .map(str::parse::<PublicationType>)
        .transpose()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let issue = app_state.issues.latest(publication).await.map_err(|e| {
        error!("Failed to read latest issue: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to read latest issue".to_string(),
        )
    })?;
    Ok(Json(LatestIssueResponse { issue }))
}
