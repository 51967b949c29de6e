// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini `generateContent` endpoint.
//!
//! No retry: a failed call is reported once and the relay falls back.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use murmur_core::{CompletionResult, MurmurError};

use crate::types::{ApiErrorResponse, GenerateContentRequest};

/// HTTP client for one Gemini model.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl GeminiClient {
    /// Creates a client authenticating with `x-goog-api-key`.
    pub fn new(
        api_key: &str,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, MurmurError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(api_key).map_err(|e| {
                MurmurError::Config(format!("invalid Gemini API key header value: {e}"))
            })?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| MurmurError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            timeout,
        })
    }

    /// Model identifier requests are sent to.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// A timed-out request becomes [`MurmurError::Timeout`], anything else a
    /// provider error.
    fn transport_error(&self, context: &str, e: reqwest::Error) -> MurmurError {
        if e.is_timeout() {
            return MurmurError::Timeout {
                duration: self.timeout,
            };
        }
        MurmurError::Provider {
            message: format!("{context}: {e}"),
            source: Some(Box::new(e)),
        }
    }

    /// Sends one request and returns the parsed body.
    pub async fn generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<CompletionResult, MurmurError> {
        let response = self
            .client
            .post(self.endpoint())
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error("HTTP request failed", e))?;

        let status = response.status();
        debug!(status = %status, model = %self.model, "generateContent response received");

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error("failed to read response body", e))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "Gemini API error ({}): {}",
                    api_err.error.status, api_err.error.message
                ),
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(MurmurError::Provider {
                message,
                source: None,
            });
        }

        serde_json::from_str(&body).map_err(|e| MurmurError::Provider {
            message: format!("failed to parse API response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}
