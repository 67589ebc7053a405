//! Shared test fixtures: an in-memory process table and a spawner
//! that plants fake transcoders into it.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use chrono::{TimeZone, Utc};
use parking_lot::Mutex;

use crate::config::Settings;
use crate::reconciler::{OutputSignature, ProcessTable, TranscoderProcess};
use crate::recorder::Spawner;
use crate::registry::RecordingRecord;

/// Deterministic record fixture (fixed start time so equality holds).
pub fn record(name: &str, pid: u32) -> RecordingRecord {
    RecordingRecord {
        name: name.to_string(),
        output_path: PathBuf::from(format!("/recordings/rec_{}_20260830_101530.mp3", name)),
        start_time: Utc.with_ymd_and_hms(2026, 8, 30, 10, 15, 30).unwrap(),
        source_url: "http://sat.ip/stream/1".to_string(),
        pid,
        duration_limit: None,
    }
}

/// Settings rooted in a scratch directory, with UTC timestamps so
/// tests are independent of the host timezone.
pub fn test_settings(dir: &Path) -> Settings {
    let mut settings = Settings::default();
    settings.recordings_dir = dir.join("recordings");
    settings.state_dir = dir.join("state");
    settings.timezone = chrono_tz::UTC;
    settings
}

/// In-memory process table.
#[derive(Default)]
pub struct FakeProcessTable {
    processes: Mutex<Vec<TranscoderProcess>>,
    terminated: Mutex<Vec<u32>>,
    killed: Mutex<Vec<u32>>,
    ignore_signals: AtomicBool,
}

impl FakeProcessTable {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add(&self, pid: u32, name: &str) {
        self.processes.lock().push(TranscoderProcess {
            pid,
            name: name.to_string(),
        });
    }

    /// When set, signaled processes stay alive (to exercise the
    /// grace-period escalation).
    pub fn ignore_signals(&self, ignore: bool) {
        self.ignore_signals.store(ignore, Ordering::SeqCst);
    }

    pub fn terminated(&self) -> Vec<u32> {
        self.terminated.lock().clone()
    }

    pub fn killed(&self) -> Vec<u32> {
        self.killed.lock().clone()
    }

    fn remove(&self, pid: u32) {
        self.processes.lock().retain(|process| process.pid != pid);
    }
}

impl ProcessTable for FakeProcessTable {
    fn transcoders(&self) -> Vec<TranscoderProcess> {
        self.processes.lock().clone()
    }

    fn is_alive(&self, pid: u32) -> bool {
        self.processes.lock().iter().any(|process| process.pid == pid)
    }

    fn terminate(&self, pid: u32) -> bool {
        if !self.is_alive(pid) {
            return false;
        }
        self.terminated.lock().push(pid);
        if !self.ignore_signals.load(Ordering::SeqCst) {
            self.remove(pid);
        }
        true
    }

    fn kill(&self, pid: u32) -> bool {
        if !self.is_alive(pid) {
            return false;
        }
        self.killed.lock().push(pid);
        self.remove(pid);
        true
    }
}

/// One recorded spawn request.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    pub source_url: String,
    pub output_path: PathBuf,
    pub duration_limit: Option<u32>,
}

/// Spawner that registers a fake transcoder in the fake process
/// table, mimicking what a real detached spawn makes observable.
pub struct FakeSpawner {
    table: Arc<FakeProcessTable>,
    signature: OutputSignature,
    next_pid: AtomicU32,
    fail: AtomicBool,
    spawned: Mutex<Vec<SpawnRequest>>,
}

impl FakeSpawner {
    pub fn new(table: Arc<FakeProcessTable>) -> Arc<Self> {
        Arc::new(Self {
            table,
            signature: OutputSignature::new("rec", "mp3"),
            next_pid: AtomicU32::new(1000),
            fail: AtomicBool::new(false),
            spawned: Mutex::new(Vec::new()),
        })
    }

    pub fn fail_next(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn spawned(&self) -> Vec<SpawnRequest> {
        self.spawned.lock().clone()
    }
}

impl Spawner for FakeSpawner {
    fn spawn(
        &self,
        source_url: &str,
        output_path: &Path,
        duration_limit: Option<u32>,
    ) -> std::io::Result<u32> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(std::io::Error::other("spawn failed"));
        }
        let pid = self.next_pid.fetch_add(1, Ordering::SeqCst);
        if let Some(name) = self.signature.name_from_argv(&[output_path.as_os_str()]) {
            self.table.add(pid, &name);
        }
        self.spawned.lock().push(SpawnRequest {
            source_url: source_url.to_string(),
            output_path: output_path.to_path_buf(),
            duration_limit,
        });
        Ok(pid)
    }
}
