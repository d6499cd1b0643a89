//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged over the REST API. Shared by the axum
//! handlers and by `NewsroomClient`, so both sides agree on field names.

use newsroom_core::domain::{GeneratedContent, NewsIssueDraft, PublicationType, ThemeType};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

//=========================================================================================
// Generation
//=========================================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateContentBody {
    pub topic: String,
    /// ISO date, `YYYY-MM-DD`.
    pub date: String,
    pub theme: ThemeType,
    pub publication: PublicationType,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateContentResponse {
    pub success: bool,
    pub data: NewsIssueDraft,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageBody {
    pub image_prompt: String,
    pub theme: ThemeType,
    pub publication: PublicationType,
}

/// `success: false` means the provider failed; the image is then always null.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageResponse {
    pub success: bool,
    /// `data:<mime>;base64,<data>`
    pub image_base64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RewriteBody {
    pub current_text: String,
    pub instruction: String,
}

/// On failure `text` is the unchanged input.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RewriteResponse {
    pub success: bool,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

//=========================================================================================
// Issues
//=========================================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IssueListResponse {
    pub issues: Vec<GeneratedContent>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaveIssueResponse {
    pub success: bool,
    pub issue: GeneratedContent,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LatestIssueResponse {
    pub issue: Option<GeneratedContent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LatestIssueQuery {
    /// Publication to restrict to, e.g. `TRIANGLE`. Any publication when absent.
    #[serde(rename = "type")]
    pub publication: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}
