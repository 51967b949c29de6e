// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the webhook and health endpoints.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
};
use serde::Serialize;
use tracing::{error, warn};

use murmur_agent::{AckStatus, Acknowledgement};

use crate::server::GatewayState;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// POST {webhook_path}
///
/// The body is parsed here rather than with the `Json` extractor so that
/// a missing content type or invalid JSON yields the same client-error body.
/// Processing runs on a tracked task: a caller that disconnects does not
/// cancel a reply that is already being delivered.
pub async fn post_webhook(
    State(state): State<GatewayState>,
    body: Bytes,
) -> (StatusCode, Json<Acknowledgement>) {
    let raw: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "webhook body is not JSON");
            return respond(Acknowledgement::client_error("body is not valid JSON"));
        }
    };

    let processor = state.processor.clone();
    let task = state
        .tasks
        .spawn(async move { processor.process_inbound_event(raw).await });

    match task.await {
        Ok(ack) => respond(ack),
        Err(e) => {
            error!(error = %e, "event task failed");
            respond(Acknowledgement::internal_error("event processing failed"))
        }
    }
}

fn respond(ack: Acknowledgement) -> (StatusCode, Json<Acknowledgement>) {
    let status = match ack.status {
        AckStatus::Ok => StatusCode::OK,
        AckStatus::ClientError => StatusCode::BAD_REQUEST,
        AckStatus::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ack))
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}
