// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message processing pipeline for the Murmur relay.
//!
//! The [`WebhookProcessor`] is the entry point. For each inbound event it:
//! - Classifies the event and extracts the sender and text
//! - Loads the sender's history from the [`ConversationStore`]
//! - Asks the [`ReplyGenerator`] for a reply
//! - Splits it with the [`MessageChunker`] and paces it out through the
//!   [`DeliveryScheduler`]
//! - Appends the exchange to the history

pub mod chunker;
pub mod delivery;
pub mod generator;
pub mod history;
pub mod processor;
pub mod sender;

pub use chunker::MessageChunker;
pub use delivery::DeliveryScheduler;
pub use generator::ReplyGenerator;
pub use history::ConversationStore;
pub use processor::{AckStatus, Acknowledgement, Classification, WebhookProcessor, classify};
pub use sender::Sender;
