// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook event classification and the per-message pipeline.
//!
//! One event yields at most one reply sequence and at most one history
//! update. Capability failures never surface to the caller; the only
//! non-success acknowledgement is a client error for malformed input.

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use murmur_core::{MessageType, UserKey};
use murmur_whatsapp::{InboundEvent, WaMessage};

use crate::chunker::MessageChunker;
use crate::delivery::DeliveryScheduler;
use crate::generator::ReplyGenerator;
use crate::history::ConversationStore;
use crate::sender::Sender;

/// Outcome reported back to the webhook caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AckStatus {
    Ok,
    ClientError,
    /// The event could not be run to completion by the server hosting the
    /// processor. Never produced by [`WebhookProcessor`] itself.
    InternalError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Acknowledgement {
    pub status: AckStatus,
    pub detail: String,
}

impl Acknowledgement {
    pub fn ok(detail: impl Into<String>) -> Self {
        Self {
            status: AckStatus::Ok,
            detail: detail.into(),
        }
    }

    pub fn client_error(detail: impl Into<String>) -> Self {
        Self {
            status: AckStatus::ClientError,
            detail: detail.into(),
        }
    }

    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self {
            status: AckStatus::InternalError,
            detail: detail.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == AckStatus::Ok
    }
}

/// What to do with one decoded event.
#[derive(Debug, PartialEq, Eq)]
pub enum Classification<'a> {
    /// Not a new-message event, or one carrying no messages.
    NotAMessage,
    /// Sent by the relay's own account.
    SelfOriginated,
    /// No sender identifier.
    MissingSender,
    /// Group membership change or other system notice.
    Stub,
    /// Plain text to answer.
    Text { sender: &'a str, text: &'a str },
    /// Media or anything else without extractable text.
    Unsupported {
        sender: &'a str,
        message_type: MessageType,
    },
}

/// Classify an event. Rules apply in priority order.
pub fn classify(event: &InboundEvent) -> Classification<'_> {
    let InboundEvent::MessagesUpsert { data } = event else {
        return Classification::NotAMessage;
    };
    let Some(message) = data.first() else {
        return Classification::NotAMessage;
    };
    classify_message(message)
}

fn classify_message(message: &WaMessage) -> Classification<'_> {
    if message.key.from_me {
        return Classification::SelfOriginated;
    }
    let Some(sender) = message.sender() else {
        return Classification::MissingSender;
    };
    if message.is_stub() {
        return Classification::Stub;
    }
    match message.text() {
        Some(text) => Classification::Text { sender, text },
        None => Classification::Unsupported {
            sender,
            message_type: message.message_type(),
        },
    }
}

/// Top-level orchestrator for inbound webhook events.
pub struct WebhookProcessor {
    generator: ReplyGenerator,
    chunker: MessageChunker,
    scheduler: DeliveryScheduler,
    store: ConversationStore,
    locks: Option<DashMap<UserKey, Arc<Mutex<()>>>>,
}

impl WebhookProcessor {
    /// Same-user events are serialized by default; see
    /// [`with_per_user_serialization`](Self::with_per_user_serialization).
    pub fn new(
        generator: ReplyGenerator,
        chunker: MessageChunker,
        scheduler: DeliveryScheduler,
        store: ConversationStore,
    ) -> Self {
        Self {
            generator,
            chunker,
            scheduler,
            store,
            locks: Some(DashMap::new()),
        }
    }

    /// When enabled, the load→save cycle for one user runs under a per-user
    /// async lock, so concurrent events from the same sender cannot lose turns.
    pub fn with_per_user_serialization(mut self, enabled: bool) -> Self {
        self.locks = enabled.then(DashMap::new);
        self
    }

    /// Handle one raw webhook payload.
    pub async fn process_inbound_event(&self, raw: serde_json::Value) -> Acknowledgement {
        let event = match InboundEvent::from_value(raw) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "rejecting malformed webhook payload");
                return Acknowledgement::client_error("malformed event payload");
            }
        };

        match classify(&event) {
            Classification::NotAMessage => {
                debug!("ignoring non-message event");
                Acknowledgement::ok("event ignored")
            }
            Classification::SelfOriginated => {
                info!("ignoring self-originated message");
                Acknowledgement::ok("own message ignored")
            }
            Classification::MissingSender => {
                warn!("message without sender identifier");
                Acknowledgement::client_error("incomplete sender data")
            }
            Classification::Stub => {
                debug!("ignoring stub notification");
                Acknowledgement::ok("notification ignored")
            }
            Classification::Unsupported {
                sender,
                message_type,
            } => {
                info!(
                    user_key = %UserKey::from_raw(sender),
                    message_type = %message_type,
                    "no text to answer"
                );
                Acknowledgement::ok("unsupported message type ignored")
            }
            Classification::Text { sender, text } => {
                self.reply(Sender::new(sender), text).await;
                Acknowledgement::ok("message processed")
            }
        }
    }

    /// load → generate → chunk → deliver → save.
    async fn reply(&self, sender: Sender, text: &str) {
        let lock = self.locks.as_ref().map(|locks| {
            locks
                .entry(sender.key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        });
        let guard = match &lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };

        let mut conversation = self.store.load(&sender.key).await;
        let reply = self.generator.generate(text, &conversation).await;
        let chunks = self.chunker.split(&reply);
        let delivered = self.scheduler.send_all(&sender.address, &chunks).await;

        if delivered < chunks.len() {
            warn!(
                user_key = %sender.key,
                delivered,
                total = chunks.len(),
                "reply only partially delivered"
            );
        } else {
            info!(user_key = %sender.key, delivered, "reply delivered");
        }

        if reply.is_empty() {
            debug!(user_key = %sender.key, "empty reply, history unchanged");
        } else {
            conversation.push_exchange(text, reply);
            self.store.save(&sender.key, &conversation).await;
        }

        drop(guard);
        drop(lock);
        self.release_lock(&sender.key);
    }

    /// Forget the lock for `key` once no other task holds or waits on it.
    fn release_lock(&self, key: &UserKey) {
        if let Some(locks) = &self.locks {
            locks.remove_if(key, |_, lock| Arc::strong_count(lock) == 1);
        }
    }

    /// Number of users with a live lock entry.
    pub fn active_users(&self) -> usize {
        self.locks.as_ref().map_or(0, DashMap::len)
    }
}
