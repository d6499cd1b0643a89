//! crates/newsroom_core/src/domain.rs
//!
//! Defines the document model of a two-page newspaper issue and the persisted
//! issue record that wraps it. Field names on the wire are camelCase so stored
//! issues and HTTP payloads share one shape.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Font-scaling hint used when a section carries no explicit `scale`.
pub const DEFAULT_SCALE: f64 = 1.0;

//=========================================================================================
// Domain Errors
//=========================================================================================

/// Errors raised when parsing domain identifiers from free text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("Unknown publication: {0}")]
    UnknownPublication(String),
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),
    #[error("Unknown issue status: {0}")]
    UnknownStatus(String),
}

//=========================================================================================
// Enumerations
//=========================================================================================

/// A named newspaper identity with its own template, theme and editorial voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublicationType {
    Triangle,
    Duskvol,
    Adventurer,
}

impl PublicationType {
    pub const ALL: [PublicationType; 3] = [
        PublicationType::Triangle,
        PublicationType::Duskvol,
        PublicationType::Adventurer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PublicationType::Triangle => "TRIANGLE",
            PublicationType::Duskvol => "DUSKVOL",
            PublicationType::Adventurer => "ADVENTURER",
        }
    }
}

impl fmt::Display for PublicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive, so `"duskvol"` and `"Duskvol"` both resolve.
impl FromStr for PublicationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_uppercase();
        PublicationType::ALL
            .into_iter()
            .find(|p| p.as_str() == key)
            .ok_or_else(|| DomainError::UnknownPublication(s.to_string()))
    }
}

/// Visual theme of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThemeType {
    ClassicRed,
    DeepBlue,
    Emerald,
    Noir,
    Parchment,
}

impl ThemeType {
    pub const ALL: [ThemeType; 5] = [
        ThemeType::ClassicRed,
        ThemeType::DeepBlue,
        ThemeType::Emerald,
        ThemeType::Noir,
        ThemeType::Parchment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeType::ClassicRed => "CLASSIC_RED",
            ThemeType::DeepBlue => "DEEP_BLUE",
            ThemeType::Emerald => "EMERALD",
            ThemeType::Noir => "NOIR",
            ThemeType::Parchment => "PARCHMENT",
        }
    }
}

impl fmt::Display for ThemeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_uppercase().replace('-', "_");
        ThemeType::ALL
            .into_iter()
            .find(|t| t.as_str() == key)
            .ok_or_else(|| DomainError::UnknownTheme(s.to_string()))
    }
}

/// Whether a persisted issue is still a draft or has been published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
    Draft,
    Published,
}

impl IssueStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueStatus::Draft => "draft",
            IssueStatus::Published => "published",
        }
    }
}

impl FromStr for IssueStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(IssueStatus::Draft),
            "published" => Ok(IssueStatus::Published),
            _ => Err(DomainError::UnknownStatus(s.to_string())),
        }
    }
}

//=========================================================================================
// Document Model
//=========================================================================================

/// A titled block of text that can be selected and edited on its own.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Section {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

impl Section {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            scale: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FrontPage {
    pub headline: String,
    pub main_story: String,
    #[serde(default)]
    pub main_image_prompt: String,
    pub news_snippets: Vec<Section>,
    pub column1: Section,
    pub column2: Section,
    pub weird_news: Section,
    /// Applies to `main_story`, which is a bare string and cannot carry its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SecondPage {
    pub editorial: Section,
    pub culture: Section,
    pub classifieds: Vec<Section>,
    pub horoscope: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

/// The text of one newspaper issue: metadata plus two pages of sections.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NewsIssueDraft {
    /// ISO date (`YYYY-MM-DD`). Generated drafts get the caller's date, not the model's.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub location: String,
    pub front_page: FrontPage,
    pub second_page: SecondPage,
}

//=========================================================================================
// Persisted Issue
//=========================================================================================

/// An issue as held in the editor preview and in the issue store.
///
/// `id` is absent until the first successful save and never changes afterwards.
/// `published_at` is stamped once, at that same first save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text_data: NewsIssueDraft,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
    pub publication_type: PublicationType,
    pub theme: ThemeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<IssueStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

impl GeneratedContent {
    /// Wraps a fresh, never-persisted draft.
    pub fn new(text_data: NewsIssueDraft, theme: ThemeType, publication: PublicationType) -> Self {
        Self {
            id: None,
            text_data,
            image_base64: None,
            publication_type: publication,
            theme,
            status: None,
            published_at: None,
        }
    }
}

//=========================================================================================
// Image Payload
//=========================================================================================

/// An inline image: base64 data plus its mime type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: String,
}

impl ImagePayload {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Encodes raw file bytes. The mime type falls back to sniffing the header.
    pub fn from_bytes(bytes: &[u8], mime_type: Option<&str>) -> Self {
        let mime_type = mime_type
            .filter(|m| !m.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| sniff_image_mime(bytes).to_string());
        Self {
            mime_type,
            data: STANDARD.encode(bytes),
        }
    }

    /// Parses `data:<mime>;base64,<data>`.
    pub fn from_data_url(url: &str) -> Option<Self> {
        let rest = url.strip_prefix("data:")?;
        let (header, data) = rest.split_once(',')?;
        let mime_type = header.strip_suffix(";base64")?;
        if mime_type.is_empty() || data.is_empty() {
            return None;
        }
        Some(Self::new(mime_type, data))
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

fn sniff_image_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "application/octet-stream",
    }
}
