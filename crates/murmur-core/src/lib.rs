// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Murmur relay.
//!
//! This crate provides the error type, the shared conversation and messaging
//! types, and the three capability traits the relay pipeline consumes:
//! completion, delivery and persistence.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::MurmurError;
pub use types::{
    AdapterType, CompletionRequest, CompletionResult, Conversation, HealthStatus, MessageType,
    OutboundMessage, Role, Turn, UserKey,
};

pub use traits::{CompletionAdapter, DeliveryAdapter, PersistenceAdapter, PluginAdapter};
