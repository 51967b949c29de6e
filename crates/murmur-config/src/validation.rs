// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as non-empty hosts, positive chunk limits, and a well-ordered delay range.

use crate::diagnostic::ConfigError;
use crate::model::MurmurConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &MurmurConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.gateway.host.trim();
    if host.is_empty() {
        fail("gateway.host must not be empty".to_string());
    } else if host.parse::<std::net::IpAddr>().is_err()
        && !host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        fail(format!(
            "gateway.host `{host}` is not a valid IP address or hostname"
        ));
    }

    if !config.gateway.webhook_path.starts_with('/') {
        fail(format!(
            "gateway.webhook_path must start with `/`, got `{}`",
            config.gateway.webhook_path
        ));
    }

    if config.storage.history_dir.trim().is_empty() {
        fail("storage.history_dir must not be empty".to_string());
    }

    let delivery = &config.delivery;
    if delivery.max_lines == 0 {
        fail("delivery.max_lines must be at least 1".to_string());
    }
    if delivery.max_chars_per_line == 0 {
        fail("delivery.max_chars_per_line must be at least 1".to_string());
    }
    if delivery.min_delay_ms > delivery.max_delay_ms {
        fail(format!(
            "delivery.min_delay_ms ({}) must not exceed delivery.max_delay_ms ({})",
            delivery.min_delay_ms, delivery.max_delay_ms
        ));
    }

    if config.gemini.timeout_secs == 0 {
        fail("gemini.timeout_secs must be at least 1".to_string());
    }
    if config.whatsapp.timeout_secs == 0 {
        fail("whatsapp.timeout_secs must be at least 1".to_string());
    }
    if let Some(t) = config.gemini.temperature
        && !(0.0..=2.0).contains(&t)
    {
        fail(format!("gemini.temperature must be within 0.0..=2.0, got {t}"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
