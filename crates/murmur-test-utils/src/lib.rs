// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Murmur integration tests.
//!
//! Provides mock adapters for fast, deterministic, CI-runnable tests without
//! external services.
//!
//! # Components
//!
//! - [`MockCompletion`] - Scripted completion backend that records requests
//! - [`MockDelivery`] - Delivery sink that captures messages and can fail on demand
//! - [`MemoryPersistence`] - In-memory record store with fault injection

pub mod memory_persistence;
pub mod mock_completion;
pub mod mock_delivery;

pub use memory_persistence::MemoryPersistence;
pub use mock_completion::MockCompletion;
pub use mock_delivery::MockDelivery;
