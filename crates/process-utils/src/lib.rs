//! Small process-related helpers shared across the workspace.
//!
//! The main export is detached spawning: children launched through
//! [`spawn_detached`] are placed in their own process group (or, on
//! Windows, detached from the parent's console) so they keep running
//! when the controller that launched them exits or restarts.

use std::ffi::OsStr;
use std::io;
use std::process::{Command, Stdio};

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;
#[cfg(windows)]
const DETACHED_PROCESS: u32 = 0x0000_0008;
#[cfg(windows)]
const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;

/// Detach a child process from the parent's lifetime.
///
/// On Unix the child is started in a new process group, so it is not
/// delivered the parent's terminal signals. On Windows the child is
/// created detached, in its own process group, without a console
/// window.
pub trait DetachExt {
    fn detach(&mut self);
}

impl DetachExt for Command {
    fn detach(&mut self) {
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            self.process_group(0);
        }
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            self.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP | CREATE_NO_WINDOW);
        }
    }
}

/// Create a `std::process::Command` configured for detached operation:
/// own process group and all stdio handles nulled.
pub fn detached_command(program: impl AsRef<OsStr>) -> Command {
    let mut cmd = Command::new(program);
    cmd.detach();
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    cmd
}

/// Spawn `cmd` and return the child's pid without waiting for it.
///
/// A background thread reaps the child on exit so it does not linger
/// as a zombie while this process is still running. If this process
/// exits first, the child is re-parented and reaped by the OS.
pub fn spawn_detached(mut cmd: Command) -> io::Result<u32> {
    let mut child = cmd.spawn()?;
    let pid = child.id();
    std::thread::spawn(move || {
        let _ = child.wait();
    });
    Ok(pid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn spawn_detached_returns_live_pid() {
        let mut cmd = detached_command("sleep");
        cmd.arg("5");
        let pid = spawn_detached(cmd).expect("spawn sleep");
        assert!(pid > 0);

        // The child is in its own process group, so its pgid differs
        // from ours.
        let out = Command::new("ps")
            .args(["-o", "pgid=", "-p", &pid.to_string()])
            .output()
            .expect("run ps");
        let pgid: u32 = String::from_utf8_lossy(&out.stdout)
            .trim()
            .parse()
            .expect("parse pgid");
        assert_eq!(pgid, pid);

        // Clean up the planted child.
        let _ = Command::new("kill").arg(pid.to_string()).status();
    }

    #[test]
    #[cfg(unix)]
    fn spawn_detached_reports_missing_program() {
        let cmd = detached_command("definitely-not-a-real-binary-xyz");
        assert!(spawn_detached(cmd).is_err());
    }
}
