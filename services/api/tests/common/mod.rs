//! Shared helpers for the api integration tests.
#![allow(dead_code)]

use api_lib::adapters::FileIssueStore;
use api_lib::config::Config;
use api_lib::web::{build_router, state::AppState};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use newsroom_core::domain::{ImagePayload, NewsIssueDraft};
use newsroom_core::ports::{
    ContentGenerationService, ContentRequest, ImageRequest, PortError, PortResult,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;

/// How the fake provider answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderMode {
    Working,
    Failing,
    NoApiKey,
}

/// Provider double that records the image prompts it receives.
pub struct FakeProvider {
    mode: ProviderMode,
    pub image_prompts: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new(mode: ProviderMode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            image_prompts: Mutex::new(Vec::new()),
        })
    }

    fn check(&self) -> PortResult<()> {
        match self.mode {
            ProviderMode::Working => Ok(()),
            ProviderMode::Failing => Err(PortError::Provider("model overloaded".to_string())),
            ProviderMode::NoApiKey => {
                Err(PortError::NotConfigured("API Key not configured".to_string()))
            }
        }
    }
}

#[async_trait]
impl ContentGenerationService for FakeProvider {
    async fn generate_issue(&self, request: &ContentRequest) -> PortResult<NewsIssueDraft> {
        self.check()?;
        let mut draft = request.publication.editor_config().blank_template(request.date);
        draft.date = "1970-01-01".to_string();
        draft.front_page.headline = format!("Extra: {}", request.topic);
        Ok(draft)
    }

    async fn generate_image(&self, request: &ImageRequest) -> PortResult<Option<ImagePayload>> {
        self.check()?;
        self.image_prompts.lock().unwrap().push(request.prompt.clone());
        Ok(Some(ImagePayload::new("image/png", "iVBORw0KGgo=")))
    }

    async fn rewrite_text(&self, current_text: &str, instruction: &str) -> PortResult<String> {
        self.check()?;
        if instruction == "erase" {
            return Ok("   ".to_string());
        }
        Ok(format!("{} [{}]", current_text, instruction))
    }
}

/// Full router over a fresh file store in a temp dir. Keep the `TempDir` alive.
pub fn build_test_app(provider: Arc<FakeProvider>) -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let data_file = dir.path().join("data/issues.json");
    let config = Config::local("127.0.0.1:0".parse().unwrap(), data_file.clone());

    let state = Arc::new(AppState {
        config: Arc::new(config),
        generator: provider,
        issues: Arc::new(FileIssueStore::new(data_file)),
    });
    (build_router(state), dir)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: &Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
