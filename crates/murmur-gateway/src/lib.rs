// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Murmur relay.
//!
//! Exposes the webhook endpoint the WhatsApp provider posts events to and a
//! health endpoint, and coordinates graceful shutdown.

pub mod handlers;
pub mod server;
pub mod shutdown;

pub use server::{GatewayState, ServerConfig, build_router, start_server};
pub use shutdown::{drain_tasks, install_signal_handler};
