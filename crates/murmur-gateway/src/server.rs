// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    routing::{get, post},
};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tower_http::trace::TraceLayer;

use murmur_agent::WebhookProcessor;
use murmur_config::model::GatewayConfig;
use murmur_core::MurmurError;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Pipeline every webhook event is handed to.
    pub processor: Arc<WebhookProcessor>,
    /// In-flight event tasks, drained on shutdown.
    pub tasks: TaskTracker,
    /// Process start time for uptime calculation.
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(processor: Arc<WebhookProcessor>) -> Self {
        Self {
            processor,
            tasks: TaskTracker::new(),
            start_time: Instant::now(),
        }
    }
}

/// Gateway server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Route the provider posts events to.
    pub webhook_path: String,
}

impl From<&GatewayConfig> for ServerConfig {
    fn from(config: &GatewayConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            webhook_path: config.webhook_path.clone(),
        }
    }
}

/// Build the router:
/// - POST `{webhook_path}`
/// - GET /health
pub fn build_router(webhook_path: &str, state: GatewayState) -> Router {
    Router::new()
        .route(webhook_path, post(handlers::post_webhook))
        .route("/health", get(handlers::get_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), MurmurError> {
    let app = build_router(&config.webhook_path, state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MurmurError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!(webhook = %config.webhook_path, "gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| MurmurError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
