//! Termination of tracked processes
//!
//! Equivalent of `pkill -F <pidfile>` for each tracked pid file, applied
//! best-effort: one failure never prevents the next attempt.

use std::path::{Path, PathBuf};

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tracing::{debug, error, info};

use crate::error::ProcessError;
use crate::process::pid_file::{is_alive, read_pid};

/// Sends a termination request to the process recorded in a pid file
pub trait Terminator {
    /// Signal the process recorded in `pid_file`, returning its pid
    fn terminate(&self, pid_file: &Path) -> Result<i32, ProcessError>;
}

/// Production terminator delivering SIGTERM
#[derive(Debug, Default, Clone, Copy)]
pub struct SignalTerminator;

impl Terminator for SignalTerminator {
    fn terminate(&self, pid_file: &Path) -> Result<i32, ProcessError> {
        let pid = read_pid(pid_file)?;

        kill(Pid::from_raw(pid), Signal::SIGTERM).map_err(|e| ProcessError::SignalFailed {
            pid,
            reason: e.to_string(),
        })?;

        Ok(pid)
    }
}

/// Outcome of a best-effort stop
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StopReport {
    /// Pid files whose process was signalled, with the pid
    pub signalled: Vec<(PathBuf, i32)>,
    /// Pid files that were absent
    pub skipped: Vec<PathBuf>,
    /// Pid files whose termination failed
    pub failed: Vec<(PathBuf, ProcessError)>,
}

impl StopReport {
    /// True when no termination attempt failed
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Terminate every process recorded in `pid_files`, in order
///
/// Absent pid files are skipped as already dead. Failures are logged and
/// collected, never propagated.
pub fn terminate_all<T: Terminator + ?Sized>(terminator: &T, pid_files: &[&Path]) -> StopReport {
    let mut report = StopReport::default();

    for &pid_file in pid_files {
        if !is_alive(pid_file) {
            debug!("No pid file at {}, process already dead", pid_file.display());
            report.skipped.push(pid_file.to_path_buf());
            continue;
        }

        match terminator.terminate(pid_file) {
            Ok(pid) => {
                info!("Sent SIGTERM to process {} ({})", pid, pid_file.display());
                report.signalled.push((pid_file.to_path_buf(), pid));
            }
            Err(e) => {
                error!("Error killing process: {}", e);
                report.failed.push((pid_file.to_path_buf(), e));
            }
        }
    }

    report
}
