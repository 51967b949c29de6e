// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the relay pipeline.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Storage-safe identifier for one user's conversation record.
///
/// Derived from the raw sender identifier; contains only `[A-Za-z0-9_]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserKey(pub String);

impl UserKey {
    /// Derives a key by replacing every character outside `[A-Za-z0-9]` with `_`.
    pub fn from_raw(raw: &str) -> Self {
        Self(
            raw.chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
                .collect(),
        )
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of capability an adapter provides.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Completion,
    Delivery,
    Persistence,
}

// --- Conversation types ---

/// Author of a conversation turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            content: content.into(),
        }
    }
}

/// Chronological, append-only turn history for one user.
///
/// Serializes as a bare JSON array of turns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// All turns, oldest first.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Appends one user turn followed by one model turn.
    pub fn push_exchange(&mut self, user_text: impl Into<String>, model_text: impl Into<String>) {
        self.turns.push(Turn::user(user_text));
        self.turns.push(Turn::model(model_text));
    }

    /// The last `limit` turns (all turns when `limit` is `None`), oldest first.
    pub fn recent(&self, limit: Option<usize>) -> &[Turn] {
        match limit {
            Some(n) if n < self.turns.len() => &self.turns[self.turns.len() - n..],
            _ => &self.turns,
        }
    }
}

impl From<Vec<Turn>> for Conversation {
    fn from(turns: Vec<Turn>) -> Self {
        Self { turns }
    }
}

// --- Messaging types ---

/// Message content type, shared by inbound classification and outbound sends.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageType {
    Text,
    Image,
    Video,
    Audio,
    Document,
    Sticker,
    Location,
    Contact,
    Reaction,
    Unknown,
}

/// A message to be delivered to one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    /// Send address (sender identifier with its domain suffix removed).
    pub recipient: String,
    pub text: String,
    pub message_type: MessageType,
    /// Media attachment URL; always `None` for relay replies.
    pub media_url: Option<String>,
}

impl OutboundMessage {
    /// A plain text message with no attachment.
    pub fn text(recipient: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            text: text.into(),
            message_type: MessageType::Text,
            media_url: None,
        }
    }
}

// --- Completion types ---

/// A request to a completion provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Persona / system instruction.
    pub system_instruction: String,
    /// Prior turns, oldest first. Empty for a fresh single-turn request.
    pub history: Vec<Turn>,
    pub user_text: String,
}

/// A completion provider's answer.
///
/// Providers may populate `text` directly, or return the nested
/// `candidates[].content.parts[].text` shape used by the Gemini REST API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResult {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl CompletionResult {
    /// A result carrying only a direct text answer.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            candidates: Vec::new(),
        }
    }

    /// A result carrying only the nested candidate shape.
    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            text: None,
            candidates: vec![Candidate {
                content: Some(CandidateContent {
                    role: Some("model".to_string()),
                    parts: parts
                        .into_iter()
                        .map(|t| Part {
                            text: Some(t.into()),
                        })
                        .collect(),
                }),
                finish_reason: None,
            }],
        }
    }
}

/// One generated candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The content of a candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One part of candidate content. Non-text parts have `text == None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}
