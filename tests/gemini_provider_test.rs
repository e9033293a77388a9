// ABOUTME: Integration tests for the Gemini provider against a mock HTTP server
// ABOUTME: Covers request shape, inline images, error mapping and model listing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Li-Lai-Lian

// Test files don't require documentation - this is a rustc lint (not clippy)
#![allow(missing_docs)]

mod common;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::{TEST_API_KEY, TEST_MODEL};
use lilailian::errors::ErrorCode;
use lilailian::llm::{ContentPart, GeminiProvider, GenerateRequest, LlmProvider};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/models/gemini-test:generateContent";

async fn provider_for(server: &MockServer) -> GeminiProvider {
    common::init_test_logging();
    GeminiProvider::from_config(&common::test_config(&server.uri())).unwrap()
}

fn text_response(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {
            "promptTokenCount": 120,
            "candidatesTokenCount": 80,
            "totalTokenCount": 200
        }
    }))
}

fn error_response(status: u16, message: &str, api_status: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({
        "error": {"code": status, "message": message, "status": api_status}
    }))
}

// ============================================================================
// Provider Metadata
// ============================================================================

#[tokio::test]
async fn test_provider_metadata() {
    let server = MockServer::start().await;
    let provider = provider_for(&server).await;

    assert_eq!(provider.name(), "gemini");
    assert_eq!(provider.display_name(), "Google Gemini");
    assert_eq!(provider.default_model(), TEST_MODEL);
    assert!(provider.capabilities().supports_vision());
    assert!(provider.capabilities().supports_model_listing());
}

// ============================================================================
// Generation
// ============================================================================

#[tokio::test]
async fn test_generate_returns_text_and_usage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", TEST_API_KEY))
        .respond_with(text_response("Nice lunch!"))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let request = GenerateRequest::new(vec![ContentPart::text("[User: A]")]);
    let reply = provider.generate(&request).await.unwrap();

    assert_eq!(reply.text, "Nice lunch!");
    assert_eq!(reply.model, TEST_MODEL);
    assert_eq!(reply.finish_reason.as_deref(), Some("STOP"));
    let usage = reply.usage.unwrap();
    assert_eq!(usage.prompt_tokens, 120);
    assert_eq!(usage.total_tokens, 200);
}

#[tokio::test]
async fn test_request_body_carries_parts_image_and_instruction() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(text_response("ok"))
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let request = GenerateRequest::new(vec![
        ContentPart::text("[User: 帥哥]"),
        ContentPart::text("User Note: 珍奶"),
        ContentPart::Image(common::png_attachment()),
    ])
    .with_system_instruction("be strict")
    .with_temperature(Some(0.4));
    provider.generate(&request).await.unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    let body: Value = serde_json::from_slice(&received[0].body).unwrap();

    let parts = body["contents"][0]["parts"].as_array().unwrap();
    assert_eq!(body["contents"][0]["role"], "user");
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0]["text"], "[User: 帥哥]");
    assert_eq!(parts[1]["text"], "User Note: 珍奶");
    assert_eq!(parts[2]["inlineData"]["mimeType"], "image/png");
    assert_eq!(
        parts[2]["inlineData"]["data"],
        STANDARD.encode(common::PNG_BYTES)
    );
    assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be strict");
    assert!((body["generationConfig"]["temperature"].as_f64().unwrap() - 0.4).abs() < 1e-6);

    // The key travels in a header, never in the URL
    assert!(!received[0].url.as_str().contains(TEST_API_KEY));
}

#[tokio::test]
async fn test_request_model_overrides_default() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-other:generateContent"))
        .respond_with(text_response("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let request =
        GenerateRequest::new(vec![ContentPart::text("hi")]).with_model("gemini-other");
    let reply = provider.generate(&request).await.unwrap();
    assert_eq!(reply.model, "gemini-other");
}

// ============================================================================
// Error Mapping
// ============================================================================

#[tokio::test]
async fn test_unauthorized_maps_to_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(error_response(403, "Permission denied", "PERMISSION_DENIED"))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let err = provider
        .generate(&GenerateRequest::new(vec![ContentPart::text("hi")]))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalAuthFailed);
    assert_eq!(err.exit_code(), 4);
}

#[tokio::test]
async fn test_unknown_model_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(error_response(
            404,
            "models/gemini-test is not found for API version v1beta",
            "NOT_FOUND",
        ))
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let err = provider
        .generate(&GenerateRequest::new(vec![ContentPart::text("hi")]))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    assert!(err.message.contains("gemini-test"));
    assert!(err.message.contains("lilailian models"));
}

#[tokio::test]
async fn test_quota_error_surfaces_retry_delay() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(error_response(
            429,
            "You exceeded your current quota. Please retry in 12.5s.",
            "RESOURCE_EXHAUSTED",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let err = provider
        .generate(&GenerateRequest::new(vec![ContentPart::text("hi")]))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalRateLimited);
    assert_eq!(
        err.message,
        "AI service quota exceeded. Please try again in 13 seconds."
    );
}

#[tokio::test]
async fn test_unreachable_server_is_unavailable() {
    common::init_test_logging();
    let config = common::test_config("http://127.0.0.1:9");
    let provider = GeminiProvider::from_config(&config).unwrap();

    let err = provider
        .generate(&GenerateRequest::new(vec![ContentPart::text("hi")]))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalServiceUnavailable);
}

#[tokio::test]
async fn test_empty_candidate_is_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let err = provider
        .generate(&GenerateRequest::new(vec![ContentPart::text("hi")]))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ExternalServiceError);
    assert!(err.message.contains("SAFETY"));
}

// ============================================================================
// Model Listing
// ============================================================================

#[tokio::test]
async fn test_list_models_follows_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [{
                "name": "models/text-embedding-004",
                "supportedGenerationMethods": ["embedContent"]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("x-goog-api-key", TEST_API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [{
                "name": "models/gemini-test",
                "displayName": "Gemini Test",
                "supportedGenerationMethods": ["generateContent", "countTokens"]
            }],
            "nextPageToken": "page-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let models = provider.list_models().await.unwrap();

    assert_eq!(models.len(), 2);
    assert_eq!(models[0].id(), "gemini-test");
    assert_eq!(models[0].display_name.as_deref(), Some("Gemini Test"));
    assert!(models[0].supports_generate_content());
    assert!(!models[1].supports_generate_content());
}

#[tokio::test]
async fn test_health_check_reflects_key_validity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(error_response(
            400,
            "API key not valid. Please pass a valid API key.",
            "INVALID_ARGUMENT",
        ))
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    assert!(!provider.health_check().await.unwrap());

    let err = provider.list_models().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ExternalAuthFailed);
}
