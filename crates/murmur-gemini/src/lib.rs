// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini completion adapter for the Murmur relay.
//!
//! Implements [`CompletionAdapter`] over the `generateContent` REST API.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use murmur_config::model::GeminiConfig;
use murmur_core::{
    AdapterType, CompletionAdapter, CompletionRequest, CompletionResult, HealthStatus,
    MurmurError, PluginAdapter,
};

pub use client::GeminiClient;

use crate::types::{GenerateContentRequest, GenerationConfig};

/// Gemini provider implementing [`CompletionAdapter`].
pub struct GeminiProvider {
    client: GeminiClient,
    temperature: Option<f32>,
    max_output_tokens: u32,
}

impl GeminiProvider {
    /// Builds a provider from configuration.
    ///
    /// Returns `Ok(None)` when no API key is configured; the relay then runs
    /// without a completion backend.
    pub fn from_config(config: &GeminiConfig) -> Result<Option<Self>, MurmurError> {
        let Some(api_key) = config.api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
            return Ok(None);
        };

        let client = GeminiClient::new(
            api_key,
            config.model.clone(),
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )?;
        info!(model = %config.model, "Gemini provider initialized");

        Ok(Some(Self {
            client,
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        }))
    }
}

#[async_trait]
impl PluginAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Completion
    }

    async fn health_check(&self) -> Result<HealthStatus, MurmurError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl CompletionAdapter for GeminiProvider {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResult, MurmurError> {
        let body = GenerateContentRequest::from_completion(
            &request,
            GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        );
        self.client.generate(&body).await
    }
}
