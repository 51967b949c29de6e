// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp integration for the Murmur relay.
//!
//! [`event`] models the webhook payloads an HTTP API provider posts to us;
//! [`WhatsAppChannel`] implements [`DeliveryAdapter`] on top of the
//! provider's send-text endpoint.

pub mod client;
pub mod event;

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use murmur_config::model::WhatsAppConfig;
use murmur_core::{
    AdapterType, DeliveryAdapter, HealthStatus, MessageType, MurmurError, OutboundMessage,
    PluginAdapter,
};

pub use client::WhatsAppClient;
pub use event::{InboundEvent, MessageKey, UpsertData, WaMessage};

/// Delivery adapter backed by a WhatsApp HTTP API provider.
pub struct WhatsAppChannel {
    client: WhatsAppClient,
    authenticated: bool,
}

impl WhatsAppChannel {
    /// Creates a channel from configuration.
    ///
    /// A blank `api_key` is treated as unset.
    pub fn new(config: &WhatsAppConfig) -> Result<Self, MurmurError> {
        let api_key = config.api_key.as_deref().filter(|k| !k.trim().is_empty());
        let client = WhatsAppClient::new(
            &config.base_url,
            &config.send_path,
            api_key,
            Duration::from_secs(config.timeout_secs),
        )?;
        info!(url = client.send_url(), "WhatsApp channel initialized");
        Ok(Self {
            client,
            authenticated: api_key.is_some(),
        })
    }

    /// Creates a channel around an existing client.
    pub fn with_client(client: WhatsAppClient) -> Self {
        Self {
            client,
            authenticated: true,
        }
    }
}

#[async_trait]
impl PluginAdapter for WhatsAppChannel {
    fn name(&self) -> &str {
        "whatsapp"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Delivery
    }

    async fn health_check(&self) -> Result<HealthStatus, MurmurError> {
        if self.authenticated {
            Ok(HealthStatus::Healthy)
        } else {
            Ok(HealthStatus::Degraded("whatsapp.api_key not set".into()))
        }
    }
}

#[async_trait]
impl DeliveryAdapter for WhatsAppChannel {
    async fn send(&self, msg: OutboundMessage) -> bool {
        if msg.message_type != MessageType::Text || msg.media_url.is_some() {
            warn!(message_type = %msg.message_type, "only text messages are supported");
            return false;
        }

        match self.client.send_text(&msg.recipient, &msg.text).await {
            Ok(()) => {
                debug!(
                    recipient = %msg.recipient,
                    chars = msg.text.chars().count(),
                    "message sent"
                );
                true
            }
            Err(e) => {
                warn!(recipient = %msg.recipient, error = %e, "send failed");
                false
            }
        }
    }
}
