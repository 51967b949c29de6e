// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! File-backed persistence for the Murmur relay.
//!
//! Each user's conversation is one JSON document under the configured
//! history directory. Writes go to a sibling temp file and are renamed over
//! the record, so a reader never observes a half-written file.

pub mod adapter;

pub use adapter::FileStorage;
