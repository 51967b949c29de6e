// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `generateContent` round trips against a mock server.

use murmur_config::model::GeminiConfig;
use murmur_core::{CompletionAdapter, CompletionRequest, MurmurError, Turn};
use murmur_gemini::GeminiProvider;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> GeminiProvider {
    let config = GeminiConfig {
        api_key: Some("test-key".into()),
        model: "gemini-test".into(),
        base_url: server.uri(),
        temperature: Some(0.9),
        max_output_tokens: 300,
        timeout_secs: 1,
    };
    GeminiProvider::from_config(&config)
        .expect("client builds")
        .expect("api key present")
}

fn request() -> CompletionRequest {
    CompletionRequest {
        system_instruction: "You are Ana.".into(),
        history: vec![Turn::user("oi"), Turn::model("oi! tudo bem?")],
        user_text: "tudo e você?".into(),
    }
}

#[tokio::test]
async fn sends_persona_history_and_config() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-test:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "systemInstruction": {"parts": [{"text": "You are Ana."}]},
            "contents": [
                {"role": "user", "parts": [{"text": "oi"}]},
                {"role": "model", "parts": [{"text": "oi! tudo bem?"}]},
                {"role": "user", "parts": [{"text": "tudo e você?"}]}
            ],
            "generationConfig": {"maxOutputTokens": 300}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Tudo ótimo!"}]},
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = provider(&server).complete(request()).await.unwrap();
    let parts = &result.candidates[0].content.as_ref().unwrap().parts;
    assert_eq!(parts[0].text.as_deref(), Some("Tudo ótimo!"));
}

#[tokio::test]
async fn api_error_message_surfaces() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {
                "code": 429,
                "message": "Resource has been exhausted",
                "status": "RESOURCE_EXHAUSTED"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = provider(&server).complete(request()).await.unwrap_err();
    let text = err.to_string();
    assert!(matches!(err, MurmurError::Provider { .. }));
    assert!(text.contains("RESOURCE_EXHAUSTED"), "got: {text}");
}

#[tokio::test]
async fn unparseable_body_is_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
        .mount(&server)
        .await;

    let err = provider(&server).complete(request()).await.unwrap_err();
    assert!(err.to_string().contains("parse"));
}

#[tokio::test]
async fn blocked_prompt_yields_empty_candidates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .mount(&server)
        .await;

    let result = provider(&server).complete(request()).await.unwrap();
    assert!(result.text.is_none());
    assert!(result.candidates.is_empty());
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"candidates": []}))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = provider(&server).complete(request()).await.unwrap_err();
    assert!(
        matches!(err, MurmurError::Timeout { duration } if duration.as_secs() == 1),
        "unexpected error: {err}"
    );
}
