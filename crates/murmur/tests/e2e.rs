// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end relay test: webhook in through the gateway, Gemini and the
//! WhatsApp provider mocked over HTTP, history on disk.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{body_json, header as header_is, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use murmur_agent::{
    ConversationStore, DeliveryScheduler, MessageChunker, ReplyGenerator, WebhookProcessor,
};
use murmur_config::model::MurmurConfig;
use murmur_core::{CompletionAdapter, Conversation, PersistenceAdapter, UserKey};
use murmur_gateway::{GatewayState, build_router};
use murmur_gemini::GeminiProvider;
use murmur_storage::FileStorage;
use murmur_whatsapp::WhatsAppChannel;

const JID: &str = "5511999998888@s.whatsapp.net";
const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

struct Relay {
    config: MurmurConfig,
    _history: tempfile::TempDir,
}

impl Relay {
    fn new(gemini: &MockServer, whatsapp: &MockServer) -> Self {
        let history = tempfile::tempdir().unwrap();
        let mut config = MurmurConfig::default();
        config.gemini.api_key = Some("gemini-key".to_string());
        config.gemini.base_url = gemini.uri();
        config.whatsapp.api_key = Some("wa-key".to_string());
        config.whatsapp.base_url = whatsapp.uri();
        config.delivery.min_delay_ms = 0;
        config.delivery.max_delay_ms = 0;
        config.storage.history_dir = history.path().display().to_string();
        Self {
            config,
            _history: history,
        }
    }

    fn router(&self) -> axum::Router {
        let completion = GeminiProvider::from_config(&self.config.gemini)
            .unwrap()
            .map(|p| Arc::new(p) as Arc<dyn CompletionAdapter>);
        let delivery = Arc::new(WhatsAppChannel::new(&self.config.whatsapp).unwrap());
        let processor = WebhookProcessor::new(
            ReplyGenerator::from_config(completion, "You are Murmur.", &self.config.agent),
            MessageChunker::from_config(&self.config.delivery),
            DeliveryScheduler::from_config(delivery, &self.config.delivery),
            ConversationStore::new(Arc::new(FileStorage::new(&self.config.storage))),
        );
        build_router(
            &self.config.gateway.webhook_path,
            GatewayState::new(Arc::new(processor)),
        )
    }

    async fn stored(&self) -> Option<Conversation> {
        let storage = FileStorage::new(&self.config.storage);
        let bytes = storage.read(&UserKey::from_raw(JID)).await.unwrap()?;
        Some(serde_json::from_slice(&bytes).unwrap())
    }
}

fn gemini_reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    }))
}

fn webhook(text: &str) -> Request<Body> {
    let event = json!({
        "event": "messages.upsert",
        "data": {"messages": {
            "key": {"remoteJid": JID, "fromMe": false, "id": "3EB0C767D26A"},
            "pushName": "Ana",
            "message": {"conversation": text}
        }}
    });
    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(event.to_string()))
        .unwrap()
}

async fn ack(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn message_is_answered_delivered_and_remembered() {
    let gemini = MockServer::start().await;
    let whatsapp = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header_is("x-goog-api-key", "gemini-key"))
        .respond_with(gemini_reply("Oi, Ana! Tudo bem?"))
        .expect(1)
        .mount(&gemini)
        .await;
    Mock::given(method("POST"))
        .and(path("/message/sendText"))
        .and(header_is("authorization", "Bearer wa-key"))
        .and(body_json(json!({"to": "5511999998888", "text": "Oi, Ana! Tudo bem?"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&whatsapp)
        .await;

    let relay = Relay::new(&gemini, &whatsapp);
    let response = relay.router().oneshot(webhook("oi")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(ack(response).await["detail"], "message processed");

    let stored = relay.stored().await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored.turns()[0].content, "oi");
    assert_eq!(stored.turns()[1].content, "Oi, Ana! Tudo bem?");
}

#[tokio::test]
async fn second_message_replays_history_to_gemini() {
    let gemini = MockServer::start().await;
    let whatsapp = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(gemini_reply("resposta"))
        .mount(&gemini)
        .await;
    Mock::given(method("POST"))
        .and(path("/message/sendText"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&whatsapp)
        .await;

    let relay = Relay::new(&gemini, &whatsapp);
    relay.router().oneshot(webhook("primeira")).await.unwrap();
    // A fresh router stands in for a restarted process.
    relay.router().oneshot(webhook("segunda")).await.unwrap();

    let requests = gemini.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let body: Value = serde_json::from_slice(&requests[1].body).unwrap();
    let contents = body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[0]["role"], "user");
    assert_eq!(contents[0]["parts"][0]["text"], "primeira");
    assert_eq!(contents[1]["role"], "model");
    assert_eq!(contents[2]["parts"][0]["text"], "segunda");
    assert_eq!(body["systemInstruction"]["parts"][0]["text"], "You are Murmur.");

    assert_eq!(relay.stored().await.unwrap().len(), 4);
}

#[tokio::test]
async fn gemini_outage_sends_fallback_and_records_it() {
    let gemini = MockServer::start().await;
    let whatsapp = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": {"code": 503, "message": "overloaded", "status": "UNAVAILABLE"}
        })))
        .mount(&gemini)
        .await;
    Mock::given(method("POST"))
        .and(path("/message/sendText"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&whatsapp)
        .await;

    let relay = Relay::new(&gemini, &whatsapp);
    let response = relay.router().oneshot(webhook("oi")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stored = relay.stored().await.unwrap();
    assert_eq!(stored.turns()[1].content, relay.config.agent.fallback_message);
}

#[tokio::test]
async fn provider_rejecting_send_still_acknowledges() {
    let gemini = MockServer::start().await;
    let whatsapp = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(gemini_reply("Oi!"))
        .mount(&gemini)
        .await;
    Mock::given(method("POST"))
        .and(path("/message/sendText"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&whatsapp)
        .await;

    let relay = Relay::new(&gemini, &whatsapp);
    let response = relay.router().oneshot(webhook("oi")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(relay.stored().await.unwrap().len(), 2);
}
