// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence adapter trait for per-user conversation records.

use async_trait::async_trait;

use crate::error::MurmurError;
use crate::traits::adapter::PluginAdapter;
use crate::types::UserKey;

/// Key-value storage for serialized conversation records.
#[async_trait]
pub trait PersistenceAdapter: PluginAdapter {
    /// Reads the record for `key`. A missing record is `Ok(None)`.
    async fn read(&self, key: &UserKey) -> Result<Option<Vec<u8>>, MurmurError>;

    /// Replaces the record for `key` with `bytes`.
    async fn write(&self, key: &UserKey, bytes: &[u8]) -> Result<(), MurmurError>;
}
