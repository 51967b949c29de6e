// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `murmur serve` command implementation.
//!
//! Wires the Gemini provider, WhatsApp channel and file storage into a
//! [`WebhookProcessor`], then serves the gateway until a shutdown signal.

use std::sync::Arc;
use std::time::Duration;

use murmur_agent::{
    ConversationStore, DeliveryScheduler, MessageChunker, ReplyGenerator, WebhookProcessor,
};
use murmur_config::model::MurmurConfig;
use murmur_config::resolve_persona;
use murmur_core::{CompletionAdapter, MurmurError};
use murmur_gateway::{GatewayState, ServerConfig, drain_tasks, install_signal_handler, start_server};
use murmur_gemini::GeminiProvider;
use murmur_storage::FileStorage;
use murmur_whatsapp::WhatsAppChannel;
use tracing::{info, warn};

/// How long shutdown waits for in-flight events.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs the `murmur serve` command.
pub async fn run_serve(config: MurmurConfig) -> Result<(), MurmurError> {
    init_tracing(&config.agent.log_level);

    info!(name = %config.agent.name, "starting murmur serve");

    let persona =
        resolve_persona(&config.agent).map_err(|e| MurmurError::Config(e.to_string()))?;
    let processor = build_processor(&config, persona)?;

    let state = GatewayState::new(Arc::new(processor));
    let tasks = state.tasks.clone();
    let shutdown = install_signal_handler();

    start_server(&ServerConfig::from(&config.gateway), state, shutdown).await?;

    drain_tasks(&tasks, DRAIN_TIMEOUT).await;
    info!("murmur stopped");
    Ok(())
}

/// Assembles the pipeline from configuration.
///
/// A missing Gemini key is not an error: the relay starts and answers every
/// message with the apology text.
pub fn build_processor(
    config: &MurmurConfig,
    persona: String,
) -> Result<WebhookProcessor, MurmurError> {
    let completion: Option<Arc<dyn CompletionAdapter>> =
        match GeminiProvider::from_config(&config.gemini)? {
            Some(provider) => Some(Arc::new(provider)),
            None => {
                warn!("gemini.api_key is not set, every reply will be the apology message");
                None
            }
        };

    if config
        .whatsapp
        .api_key
        .as_deref()
        .is_none_or(|k| k.trim().is_empty())
    {
        warn!("whatsapp.api_key is not set, sends are unauthenticated");
    }
    let delivery = Arc::new(WhatsAppChannel::new(&config.whatsapp)?);

    let storage = Arc::new(FileStorage::new(&config.storage));
    info!(dir = %storage.root().display(), "conversation history directory");

    let generator = ReplyGenerator::from_config(completion, persona, &config.agent);
    let processor = WebhookProcessor::new(
        generator,
        MessageChunker::from_config(&config.delivery),
        DeliveryScheduler::from_config(delivery, &config.delivery),
        ConversationStore::new(storage),
    )
    .with_per_user_serialization(config.agent.serialize_per_user);

    Ok(processor)
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("murmur={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
