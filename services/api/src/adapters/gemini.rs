//! services/api/src/adapters/gemini.rs
//!
//! This module contains the adapter for the Gemini generation provider.
//! It implements the `ContentGenerationService` port from the `core` crate.
//!
//! Issue text and rewrites go through Gemini's OpenAI-compatible endpoint with
//! `async-openai`. Image generation is only available on the native REST API,
//! so that call is made with `reqwest`.

use crate::adapters::prompts;
use crate::config::Config;
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat, ResponseFormatJsonSchema,
    },
    Client,
};
use async_trait::async_trait;
use newsroom_core::{
    domain::{ImagePayload, NewsIssueDraft},
    ports::{ContentGenerationService, ContentRequest, ImageRequest, PortError, PortResult},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

const NOT_CONFIGURED: &str = "API Key not configured";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ContentGenerationService` on top of Gemini.
#[derive(Clone)]
pub struct GeminiAdapter {
    /// `None` when no API key is configured; every call then fails as not configured.
    client: Option<Client<OpenAIConfig>>,
    http: reqwest::Client,
    api_key: Option<String>,
    api_base: String,
    content_model: String,
    rewrite_model: String,
    image_model: String,
}

impl GeminiAdapter {
    pub fn new(config: &Config) -> Self {
        let client = config.gemini_api_key.as_ref().map(|key| {
            Client::with_config(
                OpenAIConfig::new()
                    .with_api_key(key)
                    .with_api_base(config.gemini_openai_base.trim_end_matches('/')),
            )
        });
        Self {
            client,
            http: reqwest::Client::new(),
            api_key: config.gemini_api_key.clone(),
            api_base: config.gemini_api_base.trim_end_matches('/').to_string(),
            content_model: config.content_model.clone(),
            rewrite_model: config.rewrite_model.clone(),
            image_model: config.image_model.clone(),
        }
    }

    fn client(&self) -> PortResult<&Client<OpenAIConfig>> {
        self.client
            .as_ref()
            .ok_or_else(|| PortError::NotConfigured(NOT_CONFIGURED.to_string()))
    }

    fn api_key(&self) -> PortResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| PortError::NotConfigured(NOT_CONFIGURED.to_string()))
    }
}

//=========================================================================================
// Native Response Shapes
//=========================================================================================

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

/// The first inline image of the first candidate, if any.
fn first_inline_image(response: GenerateContentResponse) -> Option<ImagePayload> {
    response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .find_map(|part| part.inline_data)
        .map(|inline| ImagePayload::new(inline.mime_type, inline.data))
}

fn provider_error(e: OpenAIError) -> PortError {
    PortError::Provider(e.to_string())
}

//=========================================================================================
// `ContentGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ContentGenerationService for GeminiAdapter {
    async fn generate_issue(&self, request: &ContentRequest) -> PortResult<NewsIssueDraft> {
        let client = self.client()?;

        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(request.publication.editorial_profile().persona)
                .build()
                .map_err(provider_error)?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompts::content_prompt(request))
                .build()
                .map_err(provider_error)?
                .into(),
        ];

        let response_format = ResponseFormat::JsonSchema {
            json_schema: ResponseFormatJsonSchema {
                description: Some("A two-page newspaper issue".to_string()),
                name: "news_issue".to_string(),
                schema: Some(prompts::issue_schema()),
                strict: Some(false),
            },
        };

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.content_model)
            .messages(messages)
            .response_format(response_format)
            .n(1)
            .build()
            .map_err(provider_error)?;

        let response = client
            .chat()
            .create(chat_request)
            .await
            .map_err(provider_error)?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::InvalidResponse("No text returned from the provider".to_string())
            })?;
        debug!(bytes = content.len(), "Issue JSON received");

        prompts::parse_issue(&content)
    }

    async fn generate_image(&self, request: &ImageRequest) -> PortResult<Option<ImagePayload>> {
        let api_key = self.api_key()?;
        let url = format!("{}/models/{}:generateContent", self.api_base, self.image_model);
        let payload = json!({
            "contents": [{
                "parts": [{
                    "text": prompts::image_prompt(&request.prompt, request.publication, request.theme)
                }]
            }],
            "generationConfig": { "responseModalities": ["TEXT", "IMAGE"] }
        });

        let res = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PortError::Provider(format!("Request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            warn!(%status, "Image generation rejected");
            return Err(PortError::Provider(format!("API Error {}: {}", status, body)));
        }

        let body: GenerateContentResponse = res
            .json()
            .await
            .map_err(|e| PortError::InvalidResponse(format!("Parse error: {}", e)))?;

        Ok(first_inline_image(body))
    }

    async fn rewrite_text(&self, current_text: &str, instruction: &str) -> PortResult<String> {
        let client = self.client()?;

        let messages = vec![ChatCompletionRequestUserMessageArgs::default()
            .content(prompts::rewrite_prompt(current_text, instruction))
            .build()
            .map_err(provider_error)?
            .into()];

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.rewrite_model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(provider_error)?;

        let response = client
            .chat()
            .create(chat_request)
            .await
            .map_err(provider_error)?;

        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .unwrap_or_default())
    }
}
