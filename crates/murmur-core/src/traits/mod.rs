// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the Murmur relay.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod completion;
pub mod delivery;
pub mod persistence;

pub use adapter::PluginAdapter;
pub use completion::CompletionAdapter;
pub use delivery::DeliveryAdapter;
pub use persistence::PersistenceAdapter;
