// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory persistence adapter with fault injection.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use murmur_core::traits::adapter::PluginAdapter;
use murmur_core::traits::persistence::PersistenceAdapter;
use murmur_core::types::{AdapterType, Conversation, HealthStatus, UserKey};
use murmur_core::MurmurError;

/// A `HashMap`-backed record store.
#[derive(Default)]
pub struct MemoryPersistence {
    records: Arc<Mutex<HashMap<UserKey, Vec<u8>>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw bytes for `key`, bypassing the adapter interface.
    pub async fn seed_raw(&self, key: &UserKey, bytes: impl Into<Vec<u8>>) {
        self.records.lock().await.insert(key.clone(), bytes.into());
    }

    /// Store a serialized conversation for `key`.
    pub async fn seed(&self, key: &UserKey, conversation: &Conversation) {
        let bytes = serde_json::to_vec(conversation).unwrap_or_default();
        self.seed_raw(key, bytes).await;
    }

    /// Decode the record for `key`, if present and well formed.
    pub async fn conversation(&self, key: &UserKey) -> Option<Conversation> {
        let records = self.records.lock().await;
        let bytes = records.get(key)?;
        serde_json::from_slice(bytes).ok()
    }

    /// Raw record bytes for `key`.
    pub async fn raw(&self, key: &UserKey) -> Option<Vec<u8>> {
        self.records.lock().await.get(key).cloned()
    }

    /// Make every subsequent `read` fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `write` fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

fn injected(what: &str) -> MurmurError {
    MurmurError::Storage {
        source: format!("injected {what} failure").into(),
    }
}

#[async_trait]
impl PluginAdapter for MemoryPersistence {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Persistence
    }

    async fn health_check(&self) -> Result<HealthStatus, MurmurError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl PersistenceAdapter for MemoryPersistence {
    async fn read(&self, key: &UserKey) -> Result<Option<Vec<u8>>, MurmurError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(injected("read"));
        }
        Ok(self.records.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &UserKey, bytes: &[u8]) -> Result<(), MurmurError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(injected("write"));
        }
        self.records.lock().await.insert(key.clone(), bytes.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_missing_is_none() {
        let store = MemoryPersistence::new();
        assert!(store.read(&UserKey::from_raw("x")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn write_then_read() {
        let store = MemoryPersistence::new();
        let key = UserKey::from_raw("x");
        store.write(&key, b"[]").await.unwrap();
        assert_eq!(store.read(&key).await.unwrap().unwrap(), b"[]");
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn injected_failures() {
        let store = MemoryPersistence::new();
        let key = UserKey::from_raw("x");
        store.fail_writes(true);
        assert!(store.write(&key, b"[]").await.is_err());
        store.fail_reads(true);
        assert!(store.read(&key).await.is_err());
        assert_eq!(store.write_count(), 0);
    }
}
