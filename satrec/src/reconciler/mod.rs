//! Reconciliation of the registry against the live process table.
//!
//! The OS process table is the ground truth; the registry is a cache
//! to be repaired, never trusted blindly. Every read of "what is
//! recording" flows through [`Reconciler::reconcile`], which makes
//! each query self-healing: a controller that crashed and restarted
//! sees the real world on its very first query.

mod process_table;
mod signature;

pub use process_table::{ProcessTable, SysinfoProcessTable, TranscoderProcess};
pub use signature::OutputSignature;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::Result;
use crate::registry::{RecordingRecord, RegistryStore};

/// Grace period between the graceful termination signal and the
/// forceful kill.
pub const TERMINATION_GRACE: Duration = Duration::from_secs(2);

/// Send a graceful termination signal to `pid` and escalate to a
/// forceful kill if it is still alive after [`TERMINATION_GRACE`].
///
/// Returns immediately after the first signal; the escalation runs on
/// a background task. Failed delivery means the process is already
/// gone, which is logged and treated as stopped.
pub fn terminate_with_grace(table: Arc<dyn ProcessTable>, pid: u32, name: String) {
    if !table.terminate(pid) {
        debug!(name = %name, pid, "Termination signal not delivered; process already gone");
        return;
    }
    info!(name = %name, pid, "Termination signal sent");

    tokio::spawn(async move {
        tokio::time::sleep(TERMINATION_GRACE).await;
        if table.is_alive(pid) {
            warn!(name = %name, pid, "Process still alive after grace period; killing");
            table.kill(pid);
        }
    });
}

/// Repairs the registry against the live process table.
pub struct Reconciler {
    store: Arc<RegistryStore>,
    table: Arc<dyn ProcessTable>,
}

impl Reconciler {
    pub fn new(store: Arc<RegistryStore>, table: Arc<dyn ProcessTable>) -> Self {
        Self { store, table }
    }

    /// Establish current truth.
    ///
    /// 1. Enumerate live transcoder processes.
    /// 2. Load the registry snapshot.
    /// 3. Drop every entry whose pid has no live process, or whose
    ///    pid now belongs to a differently-named transcoder (pid
    ///    reuse).
    /// 4. Terminate every live transcoder with no surviving entry
    ///    (orphan), with grace escalation.
    /// 5. Persist the cleaned set iff it shrank; clear when empty.
    /// 6. Return the cleaned set.
    ///
    /// Note the deliberate fail-safe: if the registry file is corrupt
    /// the believed set is empty, so every live transcoder is treated
    /// as an orphan and terminated.
    pub async fn reconcile(&self) -> Result<Vec<RecordingRecord>> {
        let live = self.table.transcoders();
        let believed = self.store.load().await;
        let believed_len = believed.len();

        let mut survivors = Vec::with_capacity(believed_len);
        for record in believed {
            match live.iter().find(|process| process.pid == record.pid) {
                Some(process) if process.name == record.name => survivors.push(record),
                Some(process) => {
                    info!(
                        name = %record.name,
                        pid = record.pid,
                        now_running = %process.name,
                        "Registry pid was reused by another transcoder; dropping dead entry"
                    );
                }
                None => {
                    info!(
                        name = %record.name,
                        pid = record.pid,
                        "Recording process has exited; dropping dead entry"
                    );
                }
            }
        }

        for process in &live {
            if survivors.iter().any(|record| record.pid == process.pid) {
                continue;
            }
            warn!(
                name = %process.name,
                pid = process.pid,
                "Orphaned transcoder process; terminating"
            );
            terminate_with_grace(self.table.clone(), process.pid, process.name.clone());
        }

        if survivors.len() != believed_len {
            self.store.save(&survivors).await?;
        }

        Ok(survivors)
    }
}
