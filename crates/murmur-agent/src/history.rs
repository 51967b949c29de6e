// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user conversation history over a [`PersistenceAdapter`].
//!
//! Neither operation fails: a record that cannot be read or parsed loads
//! as an empty conversation, and a failed write is logged and dropped.

use std::sync::Arc;

use tracing::{debug, error, warn};

use murmur_core::{Conversation, PersistenceAdapter, UserKey};

#[derive(Clone)]
pub struct ConversationStore {
    backend: Arc<dyn PersistenceAdapter>,
}

impl ConversationStore {
    pub fn new(backend: Arc<dyn PersistenceAdapter>) -> Self {
        Self { backend }
    }

    /// Load the full history for `key`.
    pub async fn load(&self, key: &UserKey) -> Conversation {
        let bytes = match self.backend.read(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(user_key = %key, "no history yet");
                return Conversation::new();
            }
            Err(e) => {
                error!(user_key = %key, error = %e, "failed to read history");
                return Conversation::new();
            }
        };

        match serde_json::from_slice::<Conversation>(&bytes) {
            Ok(conversation) => {
                debug!(user_key = %key, turns = conversation.len(), "history loaded");
                conversation
            }
            Err(e) => {
                warn!(user_key = %key, error = %e, "history record is malformed, starting fresh");
                Conversation::new()
            }
        }
    }

    /// Overwrite the record for `key` with `conversation`.
    pub async fn save(&self, key: &UserKey, conversation: &Conversation) {
        let bytes = match serde_json::to_vec_pretty(conversation) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(user_key = %key, error = %e, "failed to serialize history");
                return;
            }
        };
        match self.backend.write(key, &bytes).await {
            Ok(()) => debug!(user_key = %key, turns = conversation.len(), "history saved"),
            Err(e) => error!(user_key = %key, error = %e, "failed to save history"),
        }
    }
}
