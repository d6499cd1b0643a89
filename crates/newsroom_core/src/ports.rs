//! crates/newsroom_core/src/ports.rs
//!
//! Defines the service contracts (traits) between the editor core and the outside
//! world: the content generation provider and the issue store. Adapters in the
//! `api` service implement them; the core only ever sees these traits.

use crate::archive;
use crate::domain::{GeneratedContent, ImagePayload, NewsIssueDraft, PublicationType, ThemeType};
use async_trait::async_trait;
use chrono::NaiveDate;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// Credentials or endpoints are missing; fatal to the request.
    #[error("Not configured: {0}")]
    NotConfigured(String),
    /// The provider could not be reached or refused the call.
    #[error("Provider error: {0}")]
    Provider(String),
    /// The provider answered with something that is not a valid result.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
    /// The issue store could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Item not found: {0}")]
    NotFound(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Requests
//=========================================================================================

/// Everything the provider needs to write a full issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRequest {
    pub topic: String,
    pub date: NaiveDate,
    pub theme: ThemeType,
    pub publication: PublicationType,
}

/// An image prompt plus the styling context it is rendered in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub prompt: String,
    pub theme: ThemeType,
    pub publication: PublicationType,
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait ContentGenerationService: Send + Sync {
    /// Writes a complete two-page issue for the request.
    async fn generate_issue(&self, request: &ContentRequest) -> PortResult<NewsIssueDraft>;

    /// Renders the main image. `Ok(None)` means the provider answered without an image.
    async fn generate_image(&self, request: &ImageRequest) -> PortResult<Option<ImagePayload>>;

    /// Rewrites `current_text` following `instruction`.
    async fn rewrite_text(&self, current_text: &str, instruction: &str) -> PortResult<String>;
}

#[async_trait]
pub trait IssueRepository: Send + Sync {
    /// All persisted issues in storage order.
    async fn list(&self) -> PortResult<Vec<GeneratedContent>>;

    /// The issue with the greatest `published_at`, optionally for one publication.
    async fn latest(
        &self,
        publication: Option<PublicationType>,
    ) -> PortResult<Option<GeneratedContent>> {
        let issues = self.list().await?;
        Ok(archive::latest(&issues, publication))
    }

    /// Persists the issue; see `archive::save_into` for the id and timestamp rules.
    async fn save(&self, content: GeneratedContent) -> PortResult<GeneratedContent>;
}
