//! services/api/src/web/generate.rs
//!
//! Handlers that proxy the editor's generation requests to the provider.
//!
//! A missing API key fails every route with a 500. Beyond that only issue text
//! generation reports provider failures as HTTP errors; image and rewrite
//! failures answer 200 with `success: false` and a neutral payload.

use crate::web::protocol::{
    GenerateContentBody, GenerateContentResponse, GenerateImageBody, GenerateImageResponse,
    RewriteBody, RewriteResponse,
};
use crate::web::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::NaiveDate;
use newsroom_core::ports::{ContentRequest, ImageRequest, PortError};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

fn not_configured(e: &PortError) -> Option<(StatusCode, String)> {
    match e {
        PortError::NotConfigured(message) => {
            error!("Generation provider is not configured: {}", message);
            Some((StatusCode::INTERNAL_SERVER_ERROR, message.clone()))
        }
        _ => None,
    }
}

/// Generate the text of a two-page issue.
#[utoipa::path(
    post,
    path = "/api/generate/content",
    request_body = GenerateContentBody,
    responses(
        (status = 200, description = "Issue text generated", body = GenerateContentResponse),
        (status = 400, description = "Malformed date"),
        (status = 500, description = "Provider not configured or generation failed")
    )
)]
pub async fn generate_content_handler(
    State(app_state): State<Arc<AppState>>,
    Json(body): Json<GenerateContentBody>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let date = NaiveDate::parse_from_str(&body.date, "%Y-%m-%d").map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Invalid date '{}': {}", body.date, e),
        )
    })?;

    let request = ContentRequest {
        topic: body.topic,
        date,
        theme: body.theme,
        publication: body.publication,
    };
    let started = Instant::now();

    match app_state.generator.generate_issue(&request).await {
        Ok(mut data) => {
            data.date = body.date;
            info!(
                publication = %request.publication,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Issue content generated"
            );
            Ok(Json(GenerateContentResponse {
                success: true,
                data,
            }))
        }
        Err(e) => {
            if let Some(rejection) = not_configured(&e) {
                return Err(rejection);
            }
            error!("Error generating text: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

/// Generate the main image for an issue.
#[utoipa::path(
    post,
    path = "/api/generate/image",
    request_body = GenerateImageBody,
    responses(
        (status = 200, description = "Image generated, or `success: false` on provider failure", body = GenerateImageResponse),
        (status = 500, description = "Provider not configured")
    )
)]
pub async fn generate_image_handler(
    State(app_state): State<Arc<AppState>>,
    Json(body): Json<GenerateImageBody>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let request = ImageRequest {
        prompt: body.image_prompt,
        theme: body.theme,
        publication: body.publication,
    };

    match app_state.generator.generate_image(&request).await {
        Ok(image) => Ok(Json(GenerateImageResponse {
            success: true,
            image_base64: image.map(|image| image.to_data_url()),
            error: None,
        })),
        Err(e) => {
            if let Some(rejection) = not_configured(&e) {
                return Err(rejection);
            }
            warn!("Error generating image: {}", e);
            Ok(Json(GenerateImageResponse {
                success: false,
                image_base64: None,
                error: Some(e.to_string()),
            }))
        }
    }
}

/// Rewrite a piece of text following an instruction.
#[utoipa::path(
    post,
    path = "/api/generate/rewrite",
    request_body = RewriteBody,
    responses(
        (status = 200, description = "Rewritten text, or the original with `success: false`", body = RewriteResponse),
        (status = 500, description = "Provider not configured")
    )
)]
pub async fn rewrite_handler(
    State(app_state): State<Arc<AppState>>,
    Json(body): Json<RewriteBody>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match app_state
        .generator
        .rewrite_text(&body.current_text, &body.instruction)
        .await
    {
        Ok(text) => {
            let text = match text.trim() {
                "" => body.current_text,
                trimmed => trimmed.to_string(),
            };
            Ok(Json(RewriteResponse {
                success: true,
                text,
                error: None,
            }))
        }
        Err(e) => {
            if let Some(rejection) = not_configured(&e) {
                return Err(rejection);
            }
            warn!("Error rewriting text: {}", e);
            Ok(Json(RewriteResponse {
                success: false,
                text: body.current_text,
                error: Some(e.to_string()),
            }))
        }
    }
}
