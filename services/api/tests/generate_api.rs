//! Integration tests for the generation proxy routes.

mod common;

use axum::http::StatusCode;
use common::{body_json, body_text, build_test_app, post_json, FakeProvider, ProviderMode};
use serde_json::json;

// ---------------------------------------------------------------------------
// Issue content
// ---------------------------------------------------------------------------

#[tokio::test]
async fn content_takes_the_requested_date() {
    let (app, _dir) = build_test_app(FakeProvider::new(ProviderMode::Working));
    let response = post_json(
        app,
        "/api/generate/content",
        &json!({ "topic": "Mars", "date": "2025-07-14", "theme": "DEEP_BLUE", "publication": "TRIANGLE" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["date"], "2025-07-14");
    assert_eq!(json["data"]["frontPage"]["headline"], "Extra: Mars");
}

#[tokio::test]
async fn content_failure_is_a_server_error_with_message() {
    let (app, _dir) = build_test_app(FakeProvider::new(ProviderMode::Failing));
    let response = post_json(
        app,
        "/api/generate/content",
        &json!({ "topic": "Mars", "date": "2025-07-14", "theme": "NOIR", "publication": "DUSKVOL" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response).await.contains("model overloaded"));
}

#[tokio::test]
async fn content_with_bad_date_is_rejected() {
    let (app, _dir) = build_test_app(FakeProvider::new(ProviderMode::Working));
    let response = post_json(
        app,
        "/api/generate/content",
        &json!({ "topic": "Mars", "date": "14/07/2025", "theme": "NOIR", "publication": "DUSKVOL" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_api_key_fails_every_route() {
    let provider = FakeProvider::new(ProviderMode::NoApiKey);
    let (app, _dir) = build_test_app(provider);

    let requests = [
        ("/api/generate/content", json!({ "topic": "t", "date": "2025-01-01", "theme": "NOIR", "publication": "TRIANGLE" })),
        ("/api/generate/image", json!({ "imagePrompt": "p", "theme": "NOIR", "publication": "TRIANGLE" })),
        ("/api/generate/rewrite", json!({ "currentText": "a", "instruction": "b" })),
    ];
    for (uri, body) in requests {
        let response = post_json(app.clone(), uri, &body).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
        assert_eq!(body_text(response).await, "API Key not configured");
    }
}

// ---------------------------------------------------------------------------
// Image
// ---------------------------------------------------------------------------

#[tokio::test]
async fn image_is_returned_as_data_url() {
    let provider = FakeProvider::new(ProviderMode::Working);
    let (app, _dir) = build_test_app(provider.clone());
    let response = post_json(
        app,
        "/api/generate/image",
        &json!({ "imagePrompt": "a foggy harbour", "theme": "NOIR", "publication": "DUSKVOL" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["imageBase64"], "data:image/png;base64,iVBORw0KGgo=");
    assert_eq!(*provider.image_prompts.lock().unwrap(), vec!["a foggy harbour".to_string()]);
}

#[tokio::test]
async fn image_failure_answers_ok_without_image() {
    let (app, _dir) = build_test_app(FakeProvider::new(ProviderMode::Failing));
    let response = post_json(
        app,
        "/api/generate/image",
        &json!({ "imagePrompt": "p", "theme": "EMERALD", "publication": "TRIANGLE" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["imageBase64"].is_null());
}

// ---------------------------------------------------------------------------
// Rewrite
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rewrite_returns_new_text() {
    let (app, _dir) = build_test_app(FakeProvider::new(ProviderMode::Working));
    let response = post_json(
        app,
        "/api/generate/rewrite",
        &json!({ "currentText": "old", "instruction": "shorter" }),
    )
    .await;

    let json = body_json(response).await;
    assert_eq!(json, json!({ "success": true, "text": "old [shorter]" }));
}

#[tokio::test]
async fn rewrite_keeps_original_on_blank_answer_or_failure() {
    let (app, _dir) = build_test_app(FakeProvider::new(ProviderMode::Working));
    let blank = post_json(
        app,
        "/api/generate/rewrite",
        &json!({ "currentText": "keep me", "instruction": "erase" }),
    )
    .await;
    assert_eq!(body_json(blank).await["text"], "keep me");

    let (failing, _dir) = build_test_app(FakeProvider::new(ProviderMode::Failing));
    let response = post_json(
        failing,
        "/api/generate/rewrite",
        &json!({ "currentText": "keep me", "instruction": "shorter" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["text"], "keep me");
}
