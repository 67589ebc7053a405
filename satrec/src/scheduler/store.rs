//! Durable persistence for schedule definitions.

use std::path::Path;

use crate::Result;
use crate::storage::SnapshotStore;

use super::ScheduleDefinition;

/// Name of the schedule file inside the state directory.
const SCHEDULE_FILE: &str = "schedules.json";

/// Whole-snapshot store of schedule definitions, persisted on every
/// mutation. Unlike the registry, an empty definition set keeps its
/// (empty) file: schedules are explicit user state, not a cache.
#[derive(Debug)]
pub struct ScheduleStore {
    inner: SnapshotStore<ScheduleDefinition>,
}

impl ScheduleStore {
    pub fn new(state_dir: &Path) -> Self {
        Self {
            inner: SnapshotStore::new(state_dir.join(SCHEDULE_FILE)),
        }
    }

    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Load all definitions; missing or corrupt data yields an empty
    /// set (logged inside the snapshot store).
    pub async fn load(&self) -> Vec<ScheduleDefinition> {
        self.inner.load().await
    }

    /// Replace the durable snapshot.
    pub async fn save(&self, definitions: &[ScheduleDefinition]) -> Result<()> {
        self.inner.save(definitions).await
    }
}
