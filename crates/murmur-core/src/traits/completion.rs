// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion adapter trait for language model integrations.

use async_trait::async_trait;

use crate::error::MurmurError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{CompletionRequest, CompletionResult};

/// Adapter for a language model completion service.
///
/// Implementations return whatever answer shape the service produces; the
/// reply generator is responsible for extracting text from it.
#[async_trait]
pub trait CompletionAdapter: PluginAdapter {
    /// Sends a persona, prior turns and a new user message; returns the answer.
    async fn complete(&self, request: CompletionRequest)
    -> Result<CompletionResult, MurmurError>;
}
