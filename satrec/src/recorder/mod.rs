//! Recording lifecycle: start, stop, stop-all, status.

mod invocation;
pub mod naming;

pub use invocation::{FfmpegSpawner, Spawner};

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::Settings;
use crate::reconciler::{ProcessTable, Reconciler, terminate_with_grace};
use crate::registry::{RecordingRecord, RegistryStore};
use crate::{Error, Result};

/// Check the identifier format: non-empty, alphanumeric only.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(Error::InvalidIdentifier(name.to_string()));
    }
    Ok(())
}

/// Starts, stops and reports recordings.
///
/// All operations reconcile first, so they act on current truth
/// rather than on whatever the registry file happens to claim. A
/// single async mutex serializes the registry read-modify-write
/// cycles of interleaved operations.
pub struct RecorderService {
    settings: Arc<Settings>,
    store: Arc<RegistryStore>,
    reconciler: Reconciler,
    table: Arc<dyn ProcessTable>,
    spawner: Arc<dyn Spawner>,
    write_gate: Mutex<()>,
}

impl RecorderService {
    pub fn new(
        settings: Arc<Settings>,
        store: Arc<RegistryStore>,
        table: Arc<dyn ProcessTable>,
        spawner: Arc<dyn Spawner>,
    ) -> Self {
        Self {
            reconciler: Reconciler::new(store.clone(), table.clone()),
            settings,
            store,
            table,
            spawner,
            write_gate: Mutex::new(()),
        }
    }

    /// Start a capture. Returns the destination path.
    ///
    /// Side-effect order matters: the latest alias is replaced before
    /// the spawn so it never points at a previous recording once this
    /// one exists, and the registry entry is appended after the spawn
    /// so a stored pid is always one that was actually assigned.
    pub async fn start(
        &self,
        name: &str,
        source_url: &str,
        duration_limit: Option<u32>,
    ) -> Result<PathBuf> {
        validate_name(name)?;

        let _guard = self.write_gate.lock().await;
        let active = self.reconciler.reconcile().await?;
        if active.iter().any(|record| record.name == name) {
            return Err(Error::DuplicateActive(name.to_string()));
        }

        let start_time = Utc::now();
        let output_path = naming::output_path(&self.settings, name, start_time);

        tokio::fs::create_dir_all(&self.settings.recordings_dir)
            .await
            .map_err(|e| {
                Error::io_path("creating recordings directory", &self.settings.recordings_dir, e)
            })?;

        let alias = naming::alias_path(&self.settings, name);
        let target_name = output_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if let Err(e) = naming::update_alias(&alias, &target_name) {
            // The alias is a convenience pointer; failing to create
            // it must not abort the capture.
            warn!(name = %name, error = %e, "Could not update latest-recording alias");
        }

        let pid = self
            .spawner
            .spawn(source_url, &output_path, duration_limit)
            .map_err(Error::SpawnFailure)?;
        info!(
            name = %name,
            pid,
            path = %output_path.display(),
            duration_minutes = duration_limit,
            "Recording started"
        );

        let mut records = active;
        records.push(RecordingRecord {
            name: name.to_string(),
            output_path: output_path.clone(),
            start_time,
            source_url: source_url.to_string(),
            pid,
            duration_limit,
        });
        self.store.save(&records).await?;

        Ok(output_path)
    }

    /// Stop a capture. Returns its destination path immediately;
    /// termination is asynchronous and registry cleanup is left to
    /// the next reconcile pass.
    pub async fn stop(&self, name: &str) -> Result<PathBuf> {
        let _guard = self.write_gate.lock().await;
        let active = self.reconciler.reconcile().await?;
        let record = active
            .iter()
            .find(|record| record.name == name)
            .ok_or_else(|| Error::not_found(name))?;

        terminate_with_grace(self.table.clone(), record.pid, record.name.clone());
        info!(name = %name, pid = record.pid, "Stop requested");
        Ok(record.output_path.clone())
    }

    /// Stop every active capture, best-effort. Returns the paths of
    /// the recordings that were signaled.
    pub async fn stop_all(&self) -> Result<Vec<PathBuf>> {
        let _guard = self.write_gate.lock().await;
        let active = self.reconciler.reconcile().await?;

        let mut stopped = Vec::with_capacity(active.len());
        for record in &active {
            terminate_with_grace(self.table.clone(), record.pid, record.name.clone());
            stopped.push(record.output_path.clone());
        }
        if !stopped.is_empty() {
            info!(count = stopped.len(), "Stop-all requested");
        }
        Ok(stopped)
    }

    /// All currently active recordings.
    pub async fn status(&self) -> Result<Vec<RecordingRecord>> {
        let _guard = self.write_gate.lock().await;
        self.reconciler.reconcile().await
    }

    /// The active recording with this name.
    pub async fn status_of(&self, name: &str) -> Result<RecordingRecord> {
        let _guard = self.write_gate.lock().await;
        let active = self.reconciler.reconcile().await?;
        active
            .into_iter()
            .find(|record| record.name == name)
            .ok_or_else(|| Error::not_found(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciler::TERMINATION_GRACE;
    use crate::testutil::{FakeProcessTable, FakeSpawner, test_settings};
    use std::time::Duration;

    struct Fixture {
        recorder: RecorderService,
        table: Arc<FakeProcessTable>,
        spawner: Arc<FakeSpawner>,
        store: Arc<RegistryStore>,
        settings: Arc<Settings>,
        _dir: tempfile::TempDir,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let settings = Arc::new(test_settings(dir.path()));
        let store = Arc::new(RegistryStore::new(&settings.state_dir));
        let table = FakeProcessTable::new();
        let spawner = FakeSpawner::new(table.clone());
        let recorder = RecorderService::new(
            settings.clone(),
            store.clone(),
            table.clone() as Arc<dyn ProcessTable>,
            spawner.clone() as Arc<dyn Spawner>,
        );
        Fixture {
            recorder,
            table,
            spawner,
            store,
            settings,
            _dir: dir,
        }
    }

    #[tokio::test]
    async fn test_start_rejects_invalid_names() {
        let f = fixture();
        for bad in ["", "has space", "slash/y", "dash-ed", "dot.ted"] {
            let err = f.recorder.start(bad, "http://s", None).await.unwrap_err();
            assert!(matches!(err, Error::InvalidIdentifier(_)), "name {:?}", bad);
        }
        // Rejected before any side effect.
        assert!(f.spawner.spawned().is_empty());
        assert!(!f.store.exists());
    }

    #[tokio::test]
    async fn test_start_spawns_and_registers() {
        let f = fixture();
        let path = f
            .recorder
            .start("news", "http://sat.ip/stream/1", Some(30))
            .await
            .unwrap();

        let file_name = path.file_name().unwrap().to_string_lossy();
        assert!(file_name.starts_with("rec_news_"));
        assert!(file_name.ends_with(".mp3"));

        let spawned = f.spawner.spawned();
        assert_eq!(spawned.len(), 1);
        assert_eq!(spawned[0].source_url, "http://sat.ip/stream/1");
        assert_eq!(spawned[0].duration_limit, Some(30));

        let records = f.store.load().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "news");
        assert_eq!(records[0].output_path, path);
        assert!(f.table.is_alive(records[0].pid));
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_start_updates_latest_alias() {
        let f = fixture();
        let path = f.recorder.start("news", "http://s", None).await.unwrap();

        let alias = naming::alias_path(&f.settings, "news");
        let target = std::fs::read_link(&alias).unwrap();
        assert_eq!(target, PathBuf::from(path.file_name().unwrap()));
    }

    #[tokio::test]
    async fn test_duplicate_active_rejected() {
        let f = fixture();
        f.recorder.start("news", "http://s", None).await.unwrap();
        let err = f.recorder.start("news", "http://s", None).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateActive(_)));
        assert_eq!(f.spawner.spawned().len(), 1);
    }

    #[tokio::test]
    async fn test_same_name_can_restart_after_process_exit() {
        let f = fixture();
        f.recorder.start("news", "http://s", None).await.unwrap();
        let pid = f.store.load().await[0].pid;

        // Simulate an external crash of the transcoder.
        f.table.kill(pid);
        f.recorder.start("news", "http://s", None).await.unwrap();
        assert_eq!(f.spawner.spawned().len(), 2);
    }

    #[tokio::test]
    async fn test_spawn_failure_writes_no_record() {
        let f = fixture();
        f.spawner.fail_next(true);
        let err = f.recorder.start("news", "http://s", None).await.unwrap_err();
        assert!(matches!(err, Error::SpawnFailure(_)));
        assert!(f.store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_stop_unknown_name_is_not_found() {
        let f = fixture();
        let err = f.recorder.stop("absent").await.unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_stop_signals_and_returns_path() {
        let f = fixture();
        let path = f.recorder.start("news", "http://s", None).await.unwrap();
        let pid = f.store.load().await[0].pid;

        let stopped = f.recorder.stop("news").await.unwrap();
        assert_eq!(stopped, path);
        assert!(f.table.terminated().contains(&pid));

        // Registry cleanup happens on the next reconcile pass.
        assert!(f.recorder.status().await.unwrap().is_empty());
        assert!(!f.store.exists());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_escalates_to_kill_after_grace() {
        let f = fixture();
        f.recorder.start("news", "http://s", None).await.unwrap();
        let pid = f.store.load().await[0].pid;

        f.table.ignore_signals(true);
        f.recorder.stop("news").await.unwrap();
        assert!(f.table.terminated().contains(&pid));
        assert!(!f.table.killed().contains(&pid));

        tokio::time::sleep(TERMINATION_GRACE + Duration::from_millis(100)).await;
        assert!(f.table.killed().contains(&pid));
    }

    #[tokio::test]
    async fn test_stop_all_signals_everything() {
        let f = fixture();
        let a = f.recorder.start("alpha", "http://s", None).await.unwrap();
        let b = f.recorder.start("beta", "http://s", None).await.unwrap();

        let mut stopped = f.recorder.stop_all().await.unwrap();
        stopped.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(stopped, expected);
        assert_eq!(f.table.terminated().len(), 2);
    }

    #[tokio::test]
    async fn test_status_drops_externally_killed_recordings() {
        let f = fixture();
        f.recorder.start("news", "http://s", None).await.unwrap();
        let pid = f.store.load().await[0].pid;

        f.table.kill(pid);
        assert!(f.recorder.status().await.unwrap().is_empty());
        assert!(!f.store.exists(), "dead entry must be cleaned up");
    }

    #[tokio::test]
    async fn test_status_of_reports_active_recording() {
        let f = fixture();
        let path = f.recorder.start("news", "http://s", None).await.unwrap();

        let record = f.recorder.status_of("news").await.unwrap();
        assert_eq!(record.output_path, path);

        let err = f.recorder.status_of("other").await.unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_validate_name() {
        assert!(validate_name("abc123").is_ok());
        assert!(validate_name("ABC").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("a_b").is_err());
        assert!(validate_name("ü").is_err());
    }
}
