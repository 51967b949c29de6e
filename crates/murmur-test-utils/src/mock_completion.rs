// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion adapter for deterministic testing.
//!
//! `MockCompletion` implements `CompletionAdapter` with pre-configured
//! outcomes and records every request it receives.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use murmur_core::traits::adapter::PluginAdapter;
use murmur_core::traits::completion::CompletionAdapter;
use murmur_core::types::{AdapterType, CompletionRequest, CompletionResult, HealthStatus};
use murmur_core::MurmurError;

/// One scripted outcome.
enum Scripted {
    Result(CompletionResult),
    Fail(String),
}

/// A mock completion backend.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty a direct
/// text answer of `"mock reply"` is returned.
pub struct MockCompletion {
    outcomes: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    latency: Option<Duration>,
}

impl MockCompletion {
    /// Create a mock with an empty outcome queue.
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            latency: None,
        }
    }

    /// Create a mock pre-loaded with direct text answers.
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let outcomes = replies
            .into_iter()
            .map(|r| Scripted::Result(CompletionResult::from_text(r)))
            .collect();
        Self {
            outcomes: Arc::new(Mutex::new(outcomes)),
            ..Self::new()
        }
    }

    /// Sleep this long inside every `complete` call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Queue an arbitrary result shape.
    pub async fn push_result(&self, result: CompletionResult) {
        self.outcomes.lock().await.push_back(Scripted::Result(result));
    }

    /// Queue a provider failure.
    pub async fn push_failure(&self, message: impl Into<String>) {
        self.outcomes
            .lock()
            .await
            .push_back(Scripted::Fail(message.into()));
    }

    /// All requests received so far, in call order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of `complete` calls so far.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockCompletion {
    fn name(&self) -> &str {
        "mock-completion"
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
impl CompletionAdapter for MockCompletion {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResult, MurmurError> {
        self.requests.lock().await.push(request);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let next = self.outcomes.lock().await.pop_front();
        match next {
            Some(Scripted::Result(result)) => Ok(result),
            Some(Scripted::Fail(message)) => Err(MurmurError::Provider {
                message,
                source: None,
            }),
            None => Ok(CompletionResult::from_text("mock reply")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use murmur_core::Turn;

    fn request(text: &str) -> CompletionRequest {
        CompletionRequest {
            system_instruction: "persona".into(),
            history: vec![Turn::user("earlier"), Turn::model("reply")],
            user_text: text.into(),
        }
    }

    #[tokio::test]
    async fn returns_queued_replies_then_default() {
        let mock = MockCompletion::with_replies(["first"]);

        let r1 = mock.complete(request("a")).await.unwrap();
        assert_eq!(r1.text.as_deref(), Some("first"));
        let r2 = mock.complete(request("b")).await.unwrap();
        assert_eq!(r2.text.as_deref(), Some("mock reply"));
    }

    #[tokio::test]
    async fn failures_surface_as_provider_errors() {
        let mock = MockCompletion::new();
        mock.push_failure("quota").await;

        let err = mock.complete(request("a")).await.unwrap_err();
        assert!(matches!(err, MurmurError::Provider { ref message, .. } if message == "quota"));
    }

    #[tokio::test]
    async fn records_requests_in_order() {
        let mock = MockCompletion::new();
        mock.complete(request("one")).await.unwrap();
        mock.complete(request("two")).await.unwrap();

        let requests = mock.requests().await;
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].user_text, "one");
        assert_eq!(requests[1].history.len(), 2);
    }
}
