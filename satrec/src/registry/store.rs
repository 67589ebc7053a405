//! Durable persistence for recording records.

use std::path::Path;

use crate::Result;
use crate::storage::SnapshotStore;

use super::RecordingRecord;

/// Name of the registry file inside the state directory.
const REGISTRY_FILE: &str = "recordings.json";

/// Whole-snapshot store of recording records.
///
/// The store file is removed entirely when the record set becomes
/// empty, so an idle controller leaves no durable artifact behind.
#[derive(Debug)]
pub struct RegistryStore {
    inner: SnapshotStore<RecordingRecord>,
}

impl RegistryStore {
    pub fn new(state_dir: &Path) -> Self {
        Self {
            inner: SnapshotStore::new(state_dir.join(REGISTRY_FILE)),
        }
    }

    /// Path of the registry file.
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Whether the registry file currently exists.
    pub fn exists(&self) -> bool {
        self.inner.exists()
    }

    /// Load the believed record set. Never fails the caller: missing
    /// or corrupt data yields an empty set.
    pub async fn load(&self) -> Vec<RecordingRecord> {
        self.inner.load().await
    }

    /// Replace the durable snapshot. An empty set removes the file.
    pub async fn save(&self, records: &[RecordingRecord]) -> Result<()> {
        if records.is_empty() {
            self.clear().await
        } else {
            self.inner.save(records).await
        }
    }

    /// Remove the registry file. Missing file is success.
    pub async fn clear(&self) -> Result<()> {
        self.inner.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::path::PathBuf;

    fn record(name: &str, pid: u32) -> RecordingRecord {
        RecordingRecord {
            name: name.to_string(),
            output_path: PathBuf::from(format!("/recordings/rec_{}_20260830_101530.mp3", name)),
            start_time: Utc::now(),
            source_url: "http://sat.ip/stream/1".to_string(),
            pid,
            duration_limit: None,
        }
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = RegistryStore::new(dir.path());
        let records = vec![record("a", 1), record("b", 2)];
        store.save(&records).await.unwrap();
        assert_eq!(store.load().await, records);
    }

    #[tokio::test]
    async fn test_saving_empty_set_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = RegistryStore::new(dir.path());
        store.save(&[record("a", 1)]).await.unwrap();
        assert!(store.exists());
        store.save(&[]).await.unwrap();
        assert!(!store.exists());
    }

    #[tokio::test]
    async fn test_corrupt_registry_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = RegistryStore::new(dir.path());
        tokio::fs::write(store.path(), b"\x00garbage").await.unwrap();
        assert!(store.load().await.is_empty());
    }
}
