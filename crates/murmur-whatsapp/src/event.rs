// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook payload model.
//!
//! The provider posts `{"event": "...", "data": {...}}`. Only
//! `messages.upsert` carries a chat message; every other event decodes to
//! [`InboundEvent::Other`].

use std::collections::BTreeMap;

use serde::Deserialize;

use murmur_core::{MessageType, MurmurError};

/// A decoded webhook event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event")]
pub enum InboundEvent {
    /// A new (or updated) message arrived.
    #[serde(rename = "messages.upsert", alias = "MESSAGES_UPSERT")]
    MessagesUpsert { data: UpsertData },

    /// Connection updates, receipts, presence and everything else.
    #[serde(other)]
    Other,
}

impl InboundEvent {
    /// Decode a raw JSON payload.
    ///
    /// Fails when the payload is not an object, has no `event` tag, or a
    /// `messages.upsert` body does not have the expected shape.
    pub fn from_value(raw: serde_json::Value) -> Result<Self, MurmurError> {
        if !raw.is_object() {
            return Err(malformed("payload is not a JSON object"));
        }
        serde_json::from_value(raw).map_err(|e| MurmurError::Channel {
            message: format!("undecodable webhook payload: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

fn malformed(message: &str) -> MurmurError {
    MurmurError::Channel {
        message: message.to_string(),
        source: None,
    }
}

/// Body of a `messages.upsert` event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpsertData {
    messages: OneOrMany,
}

impl UpsertData {
    /// The first message in the event, if any.
    pub fn first(&self) -> Option<&WaMessage> {
        match &self.messages {
            OneOrMany::One(m) => Some(m),
            OneOrMany::Many(v) => v.first(),
        }
    }

    /// Number of messages carried.
    pub fn len(&self) -> usize {
        match &self.messages {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Providers send `messages` either as a bare object or as an array.
///
/// `Many` is tried first: `WaMessage` has only defaulted fields, so it would
/// also accept a sequence.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<WaMessage>),
    One(Box<WaMessage>),
}

/// One chat message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaMessage {
    #[serde(default)]
    pub key: MessageKey,
    #[serde(default)]
    pub message: Option<MessageContent>,
    /// Set on group membership changes and other system notices.
    #[serde(default)]
    pub message_stub_type: Option<serde_json::Value>,
    #[serde(default)]
    pub push_name: Option<String>,
}

impl WaMessage {
    /// Whether this is a stub / system notification rather than a chat message.
    pub fn is_stub(&self) -> bool {
        self.message_stub_type
            .as_ref()
            .is_some_and(|v| !v.is_null())
    }

    /// The sender identifier, when present and non-blank.
    pub fn sender(&self) -> Option<&str> {
        self.key
            .remote_jid
            .as_deref()
            .filter(|jid| !jid.trim().is_empty())
    }

    /// Plain text carried by the message, if any.
    ///
    /// Checks `conversation` first, then `extendedTextMessage.text`. Blank
    /// strings do not count as text.
    pub fn text(&self) -> Option<&str> {
        let content = self.message.as_ref()?;
        content
            .conversation
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| {
                content
                    .extended_text_message
                    .as_ref()?
                    .text
                    .as_deref()
                    .filter(|t| !t.trim().is_empty())
            })
    }

    /// Content type of the message.
    pub fn message_type(&self) -> MessageType {
        match &self.message {
            Some(content) => content.message_type(),
            None => MessageType::Unknown,
        }
    }
}

/// Message addressing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageKey {
    #[serde(default)]
    pub remote_jid: Option<String>,
    #[serde(default)]
    pub from_me: bool,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub participant: Option<String>,
}

/// Message content. Only the text-bearing fields are modelled; media and
/// other payloads are kept by name to classify the message type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageContent {
    #[serde(default)]
    pub conversation: Option<String>,
    #[serde(default)]
    pub extended_text_message: Option<ExtendedText>,
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl MessageContent {
    fn message_type(&self) -> MessageType {
        if self.conversation.is_some() || self.extended_text_message.is_some() {
            return MessageType::Text;
        }
        self.other
            .keys()
            .find_map(|k| media_type(k))
            .unwrap_or(MessageType::Unknown)
    }
}

fn media_type(field: &str) -> Option<MessageType> {
    Some(match field {
        "imageMessage" => MessageType::Image,
        "videoMessage" => MessageType::Video,
        "audioMessage" | "pttMessage" => MessageType::Audio,
        "documentMessage" | "documentWithCaptionMessage" => MessageType::Document,
        "stickerMessage" => MessageType::Sticker,
        "locationMessage" | "liveLocationMessage" => MessageType::Location,
        "contactMessage" | "contactsArrayMessage" => MessageType::Contact,
        "reactionMessage" => MessageType::Reaction,
        _ => return None,
    })
}

/// `extendedTextMessage` body (replies, link previews).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExtendedText {
    #[serde(default)]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn upsert(messages: serde_json::Value) -> serde_json::Value {
        json!({"event": "messages.upsert", "data": {"messages": messages}})
    }

    fn first(event: &InboundEvent) -> &WaMessage {
        match event {
            InboundEvent::MessagesUpsert { data } => data.first().expect("one message"),
            InboundEvent::Other => panic!("expected upsert"),
        }
    }

    #[test]
    fn decodes_conversation_text() {
        let event = InboundEvent::from_value(upsert(json!({
            "key": {"remoteJid": "5511999998888@s.whatsapp.net", "fromMe": false, "id": "ABC"},
            "message": {"conversation": "oi"},
            "pushName": "Ana"
        })))
        .unwrap();

        let msg = first(&event);
        assert_eq!(msg.sender(), Some("5511999998888@s.whatsapp.net"));
        assert_eq!(msg.text(), Some("oi"));
        assert_eq!(msg.message_type(), MessageType::Text);
        assert!(!msg.key.from_me);
        assert!(!msg.is_stub());
    }

    #[test]
    fn decodes_extended_text_inside_array() {
        let event = InboundEvent::from_value(upsert(json!([{
            "key": {"remoteJid": "5511@c.us"},
            "message": {"extendedTextMessage": {"text": "see this link", "matchedText": "x"}}
        }])))
        .unwrap();
        assert_eq!(first(&event).text(), Some("see this link"));
    }

    #[test]
    fn conversation_wins_over_extended_text() {
        let event = InboundEvent::from_value(upsert(json!({
            "key": {"remoteJid": "1@c.us"},
            "message": {"conversation": "plain", "extendedTextMessage": {"text": "ext"}}
        })))
        .unwrap();
        assert_eq!(first(&event).text(), Some("plain"));
    }

    #[test]
    fn media_message_has_no_text() {
        let event = InboundEvent::from_value(upsert(json!({
            "key": {"remoteJid": "1@c.us"},
            "message": {"imageMessage": {"url": "https://x", "mimetype": "image/jpeg"}}
        })))
        .unwrap();
        let msg = first(&event);
        assert_eq!(msg.text(), None);
        assert_eq!(msg.message_type(), MessageType::Image);
    }

    #[test]
    fn stub_type_detected() {
        let event = InboundEvent::from_value(upsert(json!({
            "key": {"remoteJid": "120363@g.us"},
            "messageStubType": 27
        })))
        .unwrap();
        assert!(first(&event).is_stub());
    }

    #[test]
    fn null_stub_type_is_not_stub() {
        let event = InboundEvent::from_value(upsert(json!({
            "key": {"remoteJid": "1@c.us"},
            "message": {"conversation": "hi"},
            "messageStubType": null
        })))
        .unwrap();
        assert!(!first(&event).is_stub());
    }

    #[test]
    fn missing_key_decodes_without_sender() {
        let event =
            InboundEvent::from_value(upsert(json!({"message": {"conversation": "hi"}}))).unwrap();
        assert_eq!(first(&event).sender(), None);
    }

    #[test]
    fn other_events_ignore_their_body() {
        let event = InboundEvent::from_value(json!({
            "event": "connection.update",
            "data": {"state": "open"}
        }))
        .unwrap();
        assert_eq!(event, InboundEvent::Other);
    }

    #[test]
    fn uppercase_event_alias() {
        let event = InboundEvent::from_value(json!({
            "event": "MESSAGES_UPSERT",
            "data": {"messages": []}
        }))
        .unwrap();
        match event {
            InboundEvent::MessagesUpsert { data } => assert!(data.is_empty()),
            InboundEvent::Other => panic!("alias should decode as upsert"),
        }
    }

    #[test]
    fn non_object_payload_rejected() {
        assert!(InboundEvent::from_value(json!(["not", "an", "object"])).is_err());
        assert!(InboundEvent::from_value(json!("text")).is_err());
    }

    #[test]
    fn missing_event_tag_rejected() {
        assert!(InboundEvent::from_value(json!({"data": {}})).is_err());
    }

    #[test]
    fn upsert_without_messages_rejected() {
        assert!(InboundEvent::from_value(json!({"event": "messages.upsert", "data": {}})).is_err());
    }
}
