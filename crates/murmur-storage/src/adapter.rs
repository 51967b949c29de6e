// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filesystem implementation of the PersistenceAdapter trait.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use murmur_config::model::StorageConfig;
use murmur_core::{
    AdapterType, HealthStatus, MurmurError, PersistenceAdapter, PluginAdapter, UserKey,
};

/// Stores each record as `<history_dir>/<key>.json`.
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create a store rooted at `config.history_dir`.
    ///
    /// The directory is created lazily on the first write.
    pub fn new(config: &StorageConfig) -> Self {
        Self::with_root(&config.history_dir)
    }

    /// Create a store rooted at an explicit directory.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Directory holding the records.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, key: &UserKey) -> PathBuf {
        self.root.join(format!("{}.json", key.as_str()))
    }
}

fn storage_err(e: std::io::Error) -> MurmurError {
    MurmurError::Storage {
        source: Box::new(e),
    }
}

#[async_trait]
impl PluginAdapter for FileStorage {
    fn name(&self) -> &str {
        "file"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Persistence
    }

    async fn health_check(&self) -> Result<HealthStatus, MurmurError> {
        match tokio::fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => Ok(HealthStatus::Healthy),
            Ok(_) => Ok(HealthStatus::Unhealthy(format!(
                "{} is not a directory",
                self.root.display()
            ))),
            // Created on first write.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Degraded(e.to_string())),
        }
    }
}

#[async_trait]
impl PersistenceAdapter for FileStorage {
    async fn read(&self, key: &UserKey) -> Result<Option<Vec<u8>>, MurmurError> {
        let path = self.record_path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!(path = %path.display(), bytes = bytes.len(), "read record");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_err(e)),
        }
    }

    async fn write(&self, key: &UserKey, bytes: &[u8]) -> Result<(), MurmurError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(storage_err)?;

        let path = self.record_path(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await.map_err(storage_err)?;
        tokio::fs::rename(&tmp, &path).await.map_err(storage_err)?;

        debug!(path = %path.display(), bytes = bytes.len(), "wrote record");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn file_storage_implements_plugin_adapter() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::with_root(dir.path());

        assert_eq!(storage.name(), "file");
        assert_eq!(storage.version(), semver::Version::new(0, 1, 0));
        assert_eq!(storage.adapter_type(), AdapterType::Persistence);
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn missing_record_is_none() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::with_root(dir.path());

        let got = storage.read(&UserKey::from_raw("nobody")).await.unwrap();
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn write_creates_directory_and_record() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("nested").join("history");
        let storage = FileStorage::with_root(&root);
        let key = UserKey::from_raw("5511999998888@s.whatsapp.net");

        storage.write(&key, b"[]").await.unwrap();

        let expected = root.join("5511999998888_s_whatsapp_net.json");
        assert_eq!(std::fs::read(&expected).unwrap(), b"[]");
        assert!(!root.join("5511999998888_s_whatsapp_net.json.tmp").exists());
    }

    #[tokio::test]
    async fn write_overwrites_whole_record() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::with_root(dir.path());
        let key = UserKey::from_raw("alice");

        storage.write(&key, b"a much longer first record").await.unwrap();
        storage.write(&key, b"short").await.unwrap();

        assert_eq!(storage.read(&key).await.unwrap().unwrap(), b"short");
    }

    #[tokio::test]
    async fn root_that_is_a_file_reports_errors() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();
        let storage = FileStorage::with_root(&file);

        assert!(matches!(
            storage.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
        let err = storage.write(&UserKey::from_raw("k"), b"[]").await.unwrap_err();
        assert!(matches!(err, MurmurError::Storage { .. }));
    }
}
