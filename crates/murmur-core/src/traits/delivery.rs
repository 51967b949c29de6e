// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery adapter trait for outbound messaging.

use async_trait::async_trait;

use crate::traits::adapter::PluginAdapter;
use crate::types::OutboundMessage;

/// Adapter that pushes one message to a messaging platform.
#[async_trait]
pub trait DeliveryAdapter: PluginAdapter {
    /// Sends one message. Returns `true` when the platform accepted it.
    ///
    /// Transport failures are reported as `false`, never as a panic or error.
    async fn send(&self, msg: OutboundMessage) -> bool;
}
