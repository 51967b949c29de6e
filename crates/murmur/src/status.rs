// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `murmur status` command implementation.
//!
//! Queries the gateway health endpoint of a running server. Reports the
//! server as not running when the endpoint cannot be reached.

use std::time::Duration;

use murmur_config::model::MurmurConfig;
use murmur_core::MurmurError;
use serde::{Deserialize, Serialize};

/// Health endpoint response from the gateway.
#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
    version: String,
    uptime_secs: u64,
}

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub running: bool,
    pub status: String,
    pub version: Option<String>,
    pub uptime_secs: Option<u64>,
    pub uptime_human: Option<String>,
    pub endpoint: String,
}

/// Format seconds into a human-readable duration string.
fn format_uptime(secs: u64) -> String {
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

fn health_url(config: &MurmurConfig) -> String {
    format!("http://{}:{}/health", config.gateway.host, config.gateway.port)
}

async fn query(endpoint: &str) -> Result<StatusResponse, MurmurError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
        .map_err(|e| MurmurError::Internal(format!("failed to create HTTP client: {e}")))?;

    let offline = || StatusResponse {
        running: false,
        status: "not running".to_string(),
        version: None,
        uptime_secs: None,
        uptime_human: None,
        endpoint: endpoint.to_string(),
    };

    match client.get(endpoint).send().await {
        Ok(resp) if resp.status().is_success() => {
            let health: HealthResponse = resp.json().await.map_err(|e| {
                MurmurError::Internal(format!("failed to parse health response: {e}"))
            })?;
            Ok(StatusResponse {
                running: true,
                status: health.status,
                version: Some(health.version),
                uptime_human: Some(format_uptime(health.uptime_secs)),
                uptime_secs: Some(health.uptime_secs),
                endpoint: endpoint.to_string(),
            })
        }
        _ => Ok(offline()),
    }
}

/// Run the `murmur status` command.
pub async fn run_status(config: &MurmurConfig, json: bool) -> Result<(), MurmurError> {
    let status = query(&health_url(config)).await?;

    if json {
        let rendered = serde_json::to_string_pretty(&status)
            .map_err(|e| MurmurError::Internal(format!("failed to render status: {e}")))?;
        println!("{rendered}");
        return Ok(());
    }

    println!();
    println!("  murmur status");
    println!("  {}", "-".repeat(35));
    match (&status.version, &status.uptime_human) {
        (Some(version), Some(uptime)) => {
            println!("    State:    [OK] {} (uptime: {uptime})", status.status);
            println!("    Version:  {version}");
        }
        _ => {
            println!("    State:    [FAIL] not running");
            println!("    Endpoint: {}", status.endpoint);
            println!();
            println!("  Start with: murmur serve");
        }
    }
    println!();
    Ok(())
}
