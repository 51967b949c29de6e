// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Murmur relay.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Persona used when neither `agent.persona` nor `agent.persona_file` is set.
pub const DEFAULT_PERSONA: &str = "You are a friendly assistant chatting over WhatsApp. \
Answer in the language the user writes in. Keep replies short and conversational, \
the way a person types on a phone. Do not use markdown headings or tables.";

/// Top-level Murmur configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MurmurConfig {
    /// Relay identity, persona and reply policy.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Gemini completion backend settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// WhatsApp HTTP API provider settings.
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,

    /// Chunking and pacing of outbound replies.
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// Conversation history storage.
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP listener settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Relay identity and reply policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name used in logs and the health endpoint.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Inline persona string. Overridden by `persona_file` if both set.
    #[serde(default)]
    pub persona: Option<String>,

    /// Path to a text file containing the persona.
    /// Takes precedence over `persona` if both are set.
    #[serde(default)]
    pub persona_file: Option<String>,

    /// Sent when no completion backend is configured.
    #[serde(default = "default_apology_message")]
    pub apology_message: String,

    /// Sent when the completion call fails or yields no text.
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,

    /// Replay only the last N turns to the model. `None` replays everything.
    #[serde(default)]
    pub max_history_turns: Option<usize>,

    /// Serialize the load/save cycle per user within this process.
    #[serde(default = "default_true")]
    pub serialize_per_user: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            persona: None,
            persona_file: None,
            apology_message: default_apology_message(),
            fallback_message: default_fallback_message(),
            max_history_turns: None,
            serialize_per_user: true,
        }
    }
}

fn default_agent_name() -> String {
    "murmur".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_apology_message() -> String {
    "Sorry, I can't reply right now. Please try again later.".to_string()
}

fn default_fallback_message() -> String {
    "Sorry, I didn't quite get that. Could you say it another way?".to_string()
}

fn default_true() -> bool {
    true
}

/// Gemini API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Gemini API key. `None` runs the relay in apology-only mode.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model name, e.g. `gemini-2.0-flash`.
    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// API base URL, without trailing slash.
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Sampling temperature.
    #[serde(default)]
    pub temperature: Option<f32>,

    /// Upper bound on generated tokens.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Per-request timeout in seconds.
    #[serde(default = "default_gemini_timeout")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
            temperature: None,
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_gemini_timeout(),
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_max_output_tokens() -> u32 {
    1024
}

fn default_gemini_timeout() -> u64 {
    30
}

/// WhatsApp HTTP API provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WhatsAppConfig {
    /// Bearer token for the send endpoint.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Provider base URL, without trailing slash.
    #[serde(default = "default_whatsapp_base_url")]
    pub base_url: String,

    /// Path of the send-text endpoint, appended to `base_url`.
    #[serde(default = "default_send_path")]
    pub send_path: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_whatsapp_timeout")]
    pub timeout_secs: u64,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_whatsapp_base_url(),
            send_path: default_send_path(),
            timeout_secs: default_whatsapp_timeout(),
        }
    }
}

fn default_whatsapp_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_send_path() -> String {
    "/message/sendText".to_string()
}

fn default_whatsapp_timeout() -> u64 {
    15
}

/// Reply chunking and pacing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeliveryConfig {
    /// Maximum lines per outbound message.
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,

    /// Wrap width in characters.
    #[serde(default = "default_max_chars_per_line")]
    pub max_chars_per_line: usize,

    /// Lower bound of the pause between two messages.
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,

    /// Upper bound of the pause between two messages.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            max_lines: default_max_lines(),
            max_chars_per_line: default_max_chars_per_line(),
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_max_lines() -> usize {
    3
}

fn default_max_chars_per_line() -> usize {
    100
}

fn default_min_delay_ms() -> u64 {
    550
}

fn default_max_delay_ms() -> u64 {
    1500
}

/// Conversation history storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory holding one JSON record per user.
    #[serde(default = "default_history_dir")]
    pub history_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            history_dir: default_history_dir(),
        }
    }
}

fn default_history_dir() -> String {
    dirs::data_local_dir()
        .map(|d| d.join("murmur").join("history"))
        .unwrap_or_else(|| std::path::PathBuf::from("./history"))
        .display()
        .to_string()
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Bind host.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Route the provider posts webhook events to.
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
            webhook_path: default_webhook_path(),
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    3000
}

fn default_webhook_path() -> String {
    "/webhook".to_string()
}
