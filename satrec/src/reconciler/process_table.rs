//! Abstraction over the OS process table.
//!
//! The [`ProcessTable`] trait is the seam between the reconciler's
//! algorithm and the operating system: production code uses the
//! sysinfo-backed implementation, tests substitute an in-memory one.

use parking_lot::Mutex;
use sysinfo::{Pid, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, Signal, System, UpdateKind};

use super::OutputSignature;

/// A live transcoder process observed in the process table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscoderProcess {
    pub pid: u32,
    pub name: String,
}

/// Read and signal the OS process table.
pub trait ProcessTable: Send + Sync {
    /// Enumerate live processes recognizable as transcoders.
    fn transcoders(&self) -> Vec<TranscoderProcess>;

    /// Whether a process with this pid is currently running.
    fn is_alive(&self, pid: u32) -> bool;

    /// Send a graceful termination signal. Returns `false` if the
    /// signal could not be delivered (typically: already gone).
    fn terminate(&self, pid: u32) -> bool;

    /// Forcefully kill the process.
    fn kill(&self, pid: u32) -> bool;
}

/// sysinfo-backed process table.
pub struct SysinfoProcessTable {
    signature: OutputSignature,
    system: Mutex<System>,
}

impl SysinfoProcessTable {
    pub fn new(signature: OutputSignature) -> Self {
        Self {
            signature,
            system: Mutex::new(System::new()),
        }
    }

    fn refresh(&self) -> parking_lot::MutexGuard<'_, System> {
        let mut system = self.system.lock();
        system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_cmd(UpdateKind::Always),
        );
        system
    }

    fn is_running(process: &sysinfo::Process) -> bool {
        // A zombie has exited; only its table entry remains until the
        // parent reaps it.
        !matches!(process.status(), ProcessStatus::Zombie | ProcessStatus::Dead)
    }
}

impl ProcessTable for SysinfoProcessTable {
    fn transcoders(&self) -> Vec<TranscoderProcess> {
        let system = self.refresh();
        system
            .processes()
            .iter()
            .filter(|(_, process)| Self::is_running(process))
            .filter_map(|(pid, process)| {
                self.signature
                    .name_from_argv(process.cmd())
                    .map(|name| TranscoderProcess {
                        pid: pid.as_u32(),
                        name,
                    })
            })
            .collect()
    }

    fn is_alive(&self, pid: u32) -> bool {
        let system = self.refresh();
        system
            .process(Pid::from_u32(pid))
            .is_some_and(Self::is_running)
    }

    fn terminate(&self, pid: u32) -> bool {
        let system = self.refresh();
        match system.process(Pid::from_u32(pid)) {
            // Platforms without SIGTERM fall back to a hard kill.
            Some(process) => process.kill_with(Signal::Term).unwrap_or_else(|| process.kill()),
            None => false,
        }
    }

    fn kill(&self, pid: u32) -> bool {
        let system = self.refresh();
        system
            .process(Pid::from_u32(pid))
            .map(|process| process.kill())
            .unwrap_or(false)
    }
}
