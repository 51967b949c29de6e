// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Paced, in-order delivery of reply chunks.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, warn};

use murmur_config::model::DeliveryConfig;
use murmur_core::{DeliveryAdapter, OutboundMessage};

/// Sends chunks one at a time with a random pause between them.
pub struct DeliveryScheduler {
    delivery: Arc<dyn DeliveryAdapter>,
    min_delay_ms: u64,
    max_delay_ms: u64,
}

impl DeliveryScheduler {
    /// Pauses are drawn uniformly from `[min_delay_ms, max_delay_ms]`.
    /// Bounds given in the wrong order are swapped.
    pub fn new(delivery: Arc<dyn DeliveryAdapter>, min_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            delivery,
            min_delay_ms: min_delay_ms.min(max_delay_ms),
            max_delay_ms: max_delay_ms.max(min_delay_ms),
        }
    }

    pub fn from_config(delivery: Arc<dyn DeliveryAdapter>, config: &DeliveryConfig) -> Self {
        Self::new(delivery, config.min_delay_ms, config.max_delay_ms)
    }

    fn next_delay(&self) -> Duration {
        let ms = rand::thread_rng().gen_range(self.min_delay_ms..=self.max_delay_ms);
        Duration::from_millis(ms)
    }

    /// Send `chunks` to `recipient` in order. Returns how many were accepted.
    ///
    /// Stops at the first chunk the adapter rejects; nothing after it is sent.
    /// There is no pause after the last chunk.
    pub async fn send_all(&self, recipient: &str, chunks: &[String]) -> usize {
        let mut delivered = 0;
        for (index, chunk) in chunks.iter().enumerate() {
            if index > 0 {
                let delay = self.next_delay();
                debug!(
                    chunk = index,
                    delay_ms = delay.as_millis() as u64,
                    "pausing before next chunk"
                );
                tokio::time::sleep(delay).await;
            }

            if !self
                .delivery
                .send(OutboundMessage::text(recipient, chunk.as_str()))
                .await
            {
                warn!(
                    chunk = index,
                    delivered,
                    remaining = chunks.len() - index,
                    "delivery failed, dropping remaining chunks"
                );
                return delivered;
            }
            delivered += 1;
        }
        delivered
    }
}
