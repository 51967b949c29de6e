// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock delivery adapter for deterministic testing.
//!
//! `MockDelivery` captures every message passed to `send()` and can be told
//! to report failure on specific calls.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use murmur_core::traits::adapter::PluginAdapter;
use murmur_core::traits::delivery::DeliveryAdapter;
use murmur_core::types::{AdapterType, HealthStatus, OutboundMessage};
use murmur_core::MurmurError;

/// A mock delivery sink.
///
/// Every call is recorded in `attempts`, including failed ones; only
/// accepted messages appear in `sent_messages`.
pub struct MockDelivery {
    attempts: Arc<Mutex<Vec<OutboundMessage>>>,
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    failing_calls: HashSet<usize>,
}

impl MockDelivery {
    /// Create a sink that accepts everything.
    pub fn new() -> Self {
        Self {
            attempts: Arc::new(Mutex::new(Vec::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            failing_calls: HashSet::new(),
        }
    }

    /// Create a sink that reports failure on the given 1-based call numbers.
    pub fn failing_on(calls: impl IntoIterator<Item = usize>) -> Self {
        Self {
            failing_calls: calls.into_iter().collect(),
            ..Self::new()
        }
    }

    /// Messages the sink accepted, in order.
    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    /// Texts of accepted messages, in order.
    pub async fn sent_texts(&self) -> Vec<String> {
        self.sent.lock().await.iter().map(|m| m.text.clone()).collect()
    }

    /// Count of accepted messages.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Every `send` call, accepted or not.
    pub async fn attempt_count(&self) -> usize {
        self.attempts.lock().await.len()
    }
}

impl Default for MockDelivery {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockDelivery {
    fn name(&self) -> &str {
        "mock-delivery"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Delivery
    }

    async fn health_check(&self) -> Result<HealthStatus, MurmurError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl DeliveryAdapter for MockDelivery {
    async fn send(&self, msg: OutboundMessage) -> bool {
        let call = {
            let mut attempts = self.attempts.lock().await;
            attempts.push(msg.clone());
            attempts.len()
        };
        if self.failing_calls.contains(&call) {
            return false;
        }
        self.sent.lock().await.push(msg);
        true
    }
}
