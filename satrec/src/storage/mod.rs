//! Whole-snapshot JSON file persistence.
//!
//! Each logical store is one human-readable JSON file holding the
//! full record set. Callers always read the full set, mutate in
//! memory, and write the full set back; there are no partial updates.
//! Unreadable or corrupt data is logged and treated as an empty set,
//! never surfaced as an error to readers.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::{Error, Result};

/// A JSON-file snapshot store for a single record type.
#[derive(Debug)]
pub struct SnapshotStore<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> SnapshotStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Path of the durable artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the durable artifact currently exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the full record set.
    ///
    /// A missing file yields an empty set. Corrupt data also yields
    /// an empty set and logs a warning: the process table is the
    /// ground truth and the store is only a cache to be repaired.
    pub async fn load(&self) -> Vec<T> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read store; treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Store file is corrupt; treating as empty");
                Vec::new()
            }
        }
    }

    /// Replace the durable snapshot with `records`.
    ///
    /// The snapshot is written to a temporary file in the same
    /// directory and renamed over the old one, so readers never
    /// observe a partially written file.
    pub async fn save(&self, records: &[T]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::io_path("creating state directory", parent, e))?;
        }

        let json = serde_json::to_vec_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|e| Error::io_path("writing store snapshot", &tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| Error::io_path("replacing store snapshot", &self.path, e))?;
        Ok(())
    }

    /// Remove the durable artifact entirely. Missing file is success.
    pub async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::io_path("removing store snapshot", &self.path, e)),
        }
    }
}
