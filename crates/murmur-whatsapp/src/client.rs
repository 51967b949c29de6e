// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the provider's send-text endpoint.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::debug;

use murmur_core::MurmurError;

/// JSON body of a send-text request.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SendTextRequest<'a> {
    pub to: &'a str,
    pub text: &'a str,
}

/// Thin wrapper over `reqwest` bound to one provider endpoint.
#[derive(Debug, Clone)]
pub struct WhatsAppClient {
    client: reqwest::Client,
    send_url: String,
    timeout: Duration,
}

impl WhatsAppClient {
    /// Creates a client posting to `{base_url}{send_path}`.
    ///
    /// `api_key`, when set and not blank, is sent as a bearer token on every
    /// request.
    pub fn new(
        base_url: &str,
        send_path: &str,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, MurmurError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            let value = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|e| {
                MurmurError::Config(format!("invalid WhatsApp API key header value: {e}"))
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| MurmurError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            send_url: format!("{}{}", base_url.trim_end_matches('/'), send_path),
            timeout,
        })
    }

    /// Full URL of the send endpoint.
    pub fn send_url(&self) -> &str {
        &self.send_url
    }

    /// Posts one text message.
    ///
    /// Non-2xx responses are errors carrying the status and body.
    pub async fn send_text(&self, to: &str, text: &str) -> Result<(), MurmurError> {
        let response = self
            .client
            .post(&self.send_url)
            .json(&SendTextRequest { to, text })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MurmurError::Timeout {
                        duration: self.timeout,
                    }
                } else {
                    MurmurError::Channel {
                        message: format!("HTTP request failed: {e}"),
                        source: Some(Box::new(e)),
                    }
                }
            })?;

        let status = response.status();
        debug!(status = %status, "send response received");
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(MurmurError::Channel {
            message: format!("WhatsApp API returned {status}: {body}"),
            source: None,
        })
    }
}
