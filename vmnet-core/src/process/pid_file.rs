//! PID file probing
//!
//! Liveness on stop is decided by artifact presence: a missing pid file is
//! taken as proof that its process is gone. The zero-signal probe is only
//! used to tell a live conflicting daemon from a stale pid file.

use std::fs;
use std::path::Path;

use nix::sys::signal::kill;
use nix::unistd::Pid;

use crate::error::ProcessError;

/// Report whether the process behind `pid_file` should be treated as alive
///
/// Any stat failure (absent file, permission problem) counts as dead. The
/// recorded pid is not checked, so a stale pid file still reports `true`.
pub fn is_alive(pid_file: &Path) -> bool {
    fs::metadata(pid_file).is_ok()
}

/// Read and parse the pid recorded in `pid_file`
pub fn read_pid(pid_file: &Path) -> Result<i32, ProcessError> {
    let content = fs::read_to_string(pid_file).map_err(|e| ProcessError::PidFileUnreadable {
        path: pid_file.display().to_string(),
        reason: e.to_string(),
    })?;

    match content.trim().parse::<i32>() {
        Ok(pid) if pid > 0 => Ok(pid),
        _ => Err(ProcessError::InvalidPid {
            path: pid_file.display().to_string(),
            content: content.trim().to_string(),
        }),
    }
}

/// Check whether a process with the given pid exists
///
/// Signal 0 performs the permission and existence checks without
/// delivering anything. EPERM still means the process exists.
pub fn is_process_running(pid: i32) -> bool {
    match kill(Pid::from_raw(pid), None) {
        Ok(()) => true,
        Err(nix::errno::Errno::EPERM) => true,
        Err(_) => false,
    }
}
