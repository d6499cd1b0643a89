//! services/api/src/client.rs
//!
//! `NewsroomClient` talks to a running newsroom server over its REST API and
//! implements both core ports on top of it, so an `EditorSession` can run in a
//! separate process from the server.

use crate::web::protocol::{
    GenerateContentBody, GenerateContentResponse, GenerateImageBody, GenerateImageResponse,
    IssueListResponse, LatestIssueResponse, RewriteBody, RewriteResponse, SaveIssueResponse,
};
use async_trait::async_trait;
use newsroom_core::domain::{GeneratedContent, ImagePayload, NewsIssueDraft, PublicationType};
use newsroom_core::ports::{
    ContentGenerationService, ContentRequest, ImageRequest, IssueRepository, PortError, PortResult,
};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

#[derive(Clone)]
pub struct NewsroomClient {
    http: reqwest::Client,
    base_url: String,
}

impl NewsroomClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request and decodes a JSON body, mapping failures with `on_error`.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        on_error: fn(String) -> PortError,
    ) -> PortResult<T> {
        let res = request
            .send()
            .await
            .map_err(|e| on_error(format!("Request failed: {}", e)))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::NOT_FOUND => PortError::NotFound(body),
                _ if body.contains("API Key not configured") => PortError::NotConfigured(body),
                _ => on_error(format!("API Error {}: {}", status, body)),
            });
        }

        res.json::<T>()
            .await
            .map_err(|e| PortError::InvalidResponse(format!("Parse error: {}", e)))
    }
}

#[async_trait]
impl ContentGenerationService for NewsroomClient {
    async fn generate_issue(&self, request: &ContentRequest) -> PortResult<NewsIssueDraft> {
        let body = GenerateContentBody {
            topic: request.topic.clone(),
            date: request.date.format("%Y-%m-%d").to_string(),
            theme: request.theme,
            publication: request.publication,
        };
        let response: GenerateContentResponse = self
            .send(
                self.http.post(self.url("/api/generate/content")).json(&body),
                PortError::Provider,
            )
            .await?;
        Ok(response.data)
    }

    async fn generate_image(&self, request: &ImageRequest) -> PortResult<Option<ImagePayload>> {
        let body = GenerateImageBody {
            image_prompt: request.prompt.clone(),
            theme: request.theme,
            publication: request.publication,
        };
        let response: GenerateImageResponse = self
            .send(
                self.http.post(self.url("/api/generate/image")).json(&body),
                PortError::Provider,
            )
            .await?;

        if !response.success {
            return Err(PortError::Provider(
                response.error.unwrap_or_else(|| "Image generation failed".to_string()),
            ));
        }
        match response.image_base64 {
            Some(url) => ImagePayload::from_data_url(&url).map(Some).ok_or_else(|| {
                PortError::InvalidResponse("Image is not a base64 data URL".to_string())
            }),
            None => Ok(None),
        }
    }

    async fn rewrite_text(&self, current_text: &str, instruction: &str) -> PortResult<String> {
        let body = RewriteBody {
            current_text: current_text.to_string(),
            instruction: instruction.to_string(),
        };
        let response: RewriteResponse = self
            .send(
                self.http.post(self.url("/api/generate/rewrite")).json(&body),
                PortError::Provider,
            )
            .await?;

        if response.success {
            Ok(response.text)
        } else {
            Err(PortError::Provider(
                response.error.unwrap_or_else(|| "Rewrite failed".to_string()),
            ))
        }
    }
}

#[async_trait]
impl IssueRepository for NewsroomClient {
    async fn list(&self) -> PortResult<Vec<GeneratedContent>> {
        let response: IssueListResponse = self
            .send(self.http.get(self.url("/api/issues")), PortError::Storage)
            .await?;
        debug!(count = response.issues.len(), "Fetched issue list");
        Ok(response.issues)
    }

    async fn latest(
        &self,
        publication: Option<PublicationType>,
    ) -> PortResult<Option<GeneratedContent>> {
        let mut request = self.http.get(self.url("/api/issues/latest"));
        if let Some(publication) = publication {
            request = request.query(&[("type", publication.as_str())]);
        }
        let response: LatestIssueResponse = self.send(request, PortError::Storage).await?;
        Ok(response.issue)
    }

    async fn save(&self, content: GeneratedContent) -> PortResult<GeneratedContent> {
        let response: SaveIssueResponse = self
            .send(
                self.http.post(self.url("/api/issues")).json(&content),
                PortError::Storage,
            )
            .await?;
        Ok(response.issue)
    }
}
