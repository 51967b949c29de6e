// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `murmur config check` command implementation.
//!
//! Runs after the configuration has loaded and validated: resolves the
//! persona, builds each adapter and reports its health alongside a summary
//! of the effective settings.

use murmur_config::model::MurmurConfig;
use murmur_config::resolve_persona;
use murmur_core::{HealthStatus, MurmurError, PluginAdapter};
use murmur_gemini::GeminiProvider;
use murmur_storage::FileStorage;
use murmur_whatsapp::WhatsAppChannel;

/// Status of a single check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: &'static str,
    pub status: CheckStatus,
    pub message: String,
}

impl CheckResult {
    fn new(name: &'static str, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            name,
            status,
            message: message.into(),
        }
    }

    fn from_health(name: &'static str, health: HealthStatus, ok_message: String) -> Self {
        match health {
            HealthStatus::Healthy => Self::new(name, CheckStatus::Pass, ok_message),
            HealthStatus::Degraded(reason) => Self::new(name, CheckStatus::Warn, reason),
            HealthStatus::Unhealthy(reason) => Self::new(name, CheckStatus::Fail, reason),
        }
    }
}

/// Runs the checks and prints them. Returns `false` if any check failed.
pub async fn run_config_check(config: &MurmurConfig) -> Result<bool, MurmurError> {
    let results = collect_checks(config).await?;

    println!();
    println!("  murmur config check");
    println!("  {}", "-".repeat(50));
    for result in &results {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        println!("    {tag} {:<12} {}", result.name, result.message);
    }
    println!();
    print_summary(config);

    Ok(!results.iter().any(|r| r.status == CheckStatus::Fail))
}

pub async fn collect_checks(config: &MurmurConfig) -> Result<Vec<CheckResult>, MurmurError> {
    let mut results = Vec::new();

    results.push(match resolve_persona(&config.agent) {
        Ok(persona) => CheckResult::new(
            "persona",
            CheckStatus::Pass,
            format!("{} chars", persona.chars().count()),
        ),
        Err(e) => CheckResult::new("persona", CheckStatus::Fail, e.to_string()),
    });

    results.push(match GeminiProvider::from_config(&config.gemini)? {
        Some(provider) => CheckResult::from_health(
            "gemini",
            provider.health_check().await?,
            format!("model {}", config.gemini.model),
        ),
        None => CheckResult::new(
            "gemini",
            CheckStatus::Warn,
            "no api_key, replies will be the apology message",
        ),
    });

    let channel = WhatsAppChannel::new(&config.whatsapp)?;
    results.push(CheckResult::from_health(
        "whatsapp",
        channel.health_check().await?,
        format!("{}{}", config.whatsapp.base_url, config.whatsapp.send_path),
    ));

    let storage = FileStorage::new(&config.storage);
    results.push(CheckResult::from_health(
        "storage",
        storage.health_check().await?,
        storage.root().display().to_string(),
    ));

    Ok(results)
}

fn print_summary(config: &MurmurConfig) {
    let history = config
        .agent
        .max_history_turns
        .map_or_else(|| "all".to_string(), |n| n.to_string());
    println!("    agent:     {} (log level {})", config.agent.name, config.agent.log_level);
    println!(
        "    gateway:   http://{}:{}{}",
        config.gateway.host, config.gateway.port, config.gateway.webhook_path
    );
    println!(
        "    delivery:  {} lines x {} chars, {}-{}ms between chunks",
        config.delivery.max_lines,
        config.delivery.max_chars_per_line,
        config.delivery.min_delay_ms,
        config.delivery.max_delay_ms
    );
    println!(
        "    history:   replay {history} turns, per-user serialization {}",
        if config.agent.serialize_per_user { "on" } else { "off" }
    );
    println!();
}
