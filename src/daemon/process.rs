//! Daemon process management
//!
//! Detaches the supervisor from the invoking terminal, redirects its output to
//! the session log file and owns the supervisor pid file for its lifetime.

use std::fs::{self, File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::process;

use daemonize::{Daemonize, Outcome};
use tracing::{debug, info, warn};

use vmnet_core::error::DaemonError;
use vmnet_core::process::{is_process_running, read_pid};
use vmnet_core::session::SessionPaths;
use vmnet_core::LogHandle;

/// Permission bits of the pid and log files (rw-r--r--)
const FILE_MODE: u32 = 0o644;
/// umask making the detachment library create the pid file with `FILE_MODE`
const DAEMON_UMASK: u32 = 0o022;

/// Which side of the detachment the caller ended up on
pub enum Detached {
    /// The invoking process; the daemon now runs independently
    Parent,
    /// The detached daemon, holding its pid file until dropped
    Child(PidFileGuard),
}

/// Removes the daemon pid file when dropped
pub struct PidFileGuard {
    pid_file: PathBuf,
}

impl PidFileGuard {
    /// Path of the guarded pid file
    pub fn path(&self) -> &Path {
        &self.pid_file
    }
}

impl Drop for PidFileGuard {
    fn drop(&mut self) {
        match fs::remove_file(&self.pid_file) {
            Ok(()) => debug!("Released pid file {}", self.pid_file.display()),
            Err(e) => warn!("Failed to release pid file {}: {}", self.pid_file.display(), e),
        }
    }
}

/// Represents the daemon process of one session
pub struct DaemonProcess {
    dir: PathBuf,
    pid_file: PathBuf,
    log_file: PathBuf,
}

impl DaemonProcess {
    /// Create a daemon process manager for a session
    pub fn new(paths: &SessionPaths) -> Self {
        Self {
            dir: paths.dir.clone(),
            pid_file: paths.pid_file.clone(),
            log_file: paths.log_file.clone(),
        }
    }

    /// Fail with `AlreadyRunning` if the pid file names a live process
    ///
    /// Stale pid files (dead or unparseable pid) are left to be overwritten.
    pub fn ensure_not_running(&self) -> Result<(), DaemonError> {
        if !self.pid_file.exists() {
            return Ok(());
        }

        match read_pid(&self.pid_file) {
            Ok(pid) if is_process_running(pid) => Err(DaemonError::AlreadyRunning {
                pid,
                pid_file: self.pid_file.clone(),
            }),
            Ok(pid) => {
                debug!("Ignoring stale pid file for dead process {}", pid);
                Ok(())
            }
            Err(e) => {
                debug!("Ignoring unusable pid file: {}", e);
                Ok(())
            }
        }
    }

    /// Daemonize the current process
    ///
    /// Returns `Detached::Parent` in the invoking process and
    /// `Detached::Child` in the detached daemon, whose logs are switched to
    /// plain text since they now go to the log file.
    pub fn daemonize(&self, logs: &LogHandle) -> Result<Detached, DaemonError> {
        self.ensure_not_running()?;

        fs::create_dir_all(&self.dir).map_err(|source| DaemonError::CreateDirectory {
            path: self.dir.clone(),
            source,
        })?;

        let stdout = self.open_log_file()?;
        let stderr = self.open_log_file()?;

        let working_directory =
            std::env::current_dir().map_err(|e| DaemonError::DetachFailed {
                reason: format!("Failed to get current directory: {}", e),
            })?;

        let daemonize = Daemonize::new()
            .pid_file(&self.pid_file)
            .working_directory(working_directory)
            .umask(DAEMON_UMASK)
            .stdout(stdout)
            .stderr(stderr);

        match daemonize.execute() {
            Outcome::Parent(Ok(parent)) if parent.first_child_exit_code == 0 => {
                Ok(Detached::Parent)
            }
            Outcome::Parent(Ok(parent)) => Err(DaemonError::DetachFailed {
                reason: format!(
                    "detached process exited with code {}",
                    parent.first_child_exit_code
                ),
            }),
            Outcome::Parent(Err(e)) | Outcome::Child(Err(e)) => Err(DaemonError::DetachFailed {
                reason: e.to_string(),
            }),
            Outcome::Child(Ok(_)) => {
                logs.plain_text();
                let guard = PidFileGuard {
                    pid_file: self.pid_file.clone(),
                };

                info!("- - - - - - - - - - - - - - -");
                info!("colima-vmnet daemon started with PID {}", process::id());
                info!("Run `sudo pkill -F {}` to kill the daemon", guard.path().display());

                Ok(Detached::Child(guard))
            }
        }
    }

    fn open_log_file(&self) -> Result<File, DaemonError> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .mode(FILE_MODE)
            .open(&self.log_file)
            .map_err(|source| DaemonError::LogFile {
                path: self.log_file.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use vmnet_core::session::SessionId;

    fn daemon_in(temp_dir: &TempDir) -> (SessionPaths, DaemonProcess) {
        let paths = SessionPaths::resolve(temp_dir.path(), &SessionId::new("dev").unwrap());
        let daemon = DaemonProcess::new(&paths);
        (paths, daemon)
    }

    #[test]
    fn test_no_pid_file_is_not_running() {
        let temp_dir = TempDir::new().unwrap();
        let (_, daemon) = daemon_in(&temp_dir);
        assert!(daemon.ensure_not_running().is_ok());
    }

    #[test]
    fn test_live_pid_conflicts() {
        let temp_dir = TempDir::new().unwrap();
        let (paths, daemon) = daemon_in(&temp_dir);
        fs::create_dir_all(&paths.dir).unwrap();
        fs::write(&paths.pid_file, process::id().to_string()).unwrap();

        match daemon.daemonize(&LogHandle::default()) {
            Err(DaemonError::AlreadyRunning { pid, pid_file }) => {
                assert_eq!(pid, process::id() as i32);
                assert_eq!(pid_file, paths.pid_file);
            }
            _ => panic!("expected AlreadyRunning"),
        }
        // Conflict is detected before any file is touched
        assert!(!paths.log_file.exists());
    }

    #[test]
    fn test_stale_pid_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let (paths, daemon) = daemon_in(&temp_dir);
        fs::create_dir_all(&paths.dir).unwrap();

        fs::write(&paths.pid_file, "garbage").unwrap();
        assert!(daemon.ensure_not_running().is_ok());

        let mut child = process::Command::new("true").spawn().unwrap();
        let dead_pid = child.id();
        child.wait().unwrap();
        fs::write(&paths.pid_file, dead_pid.to_string()).unwrap();
        assert!(daemon.ensure_not_running().is_ok());
    }

    #[test]
    fn test_log_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let (paths, daemon) = daemon_in(&temp_dir);
        fs::create_dir_all(&paths.dir).unwrap();

        let _ = daemon.open_log_file().unwrap();
        let mode = fs::metadata(&paths.log_file).unwrap().permissions().mode();
        assert_eq!(mode & 0o600, 0o600, "owner must read and write");
        assert_eq!(mode & 0o133, 0, "no exec bits, no group/other writes");
    }

    #[test]
    fn test_guard_releases_pid_file() {
        let temp_dir = TempDir::new().unwrap();
        let pid_file = temp_dir.path().join("colima-daemon.pid");
        fs::write(&pid_file, "1").unwrap();

        {
            let guard = PidFileGuard {
                pid_file: pid_file.clone(),
            };
            assert_eq!(guard.path(), pid_file.as_path());
        }

        assert!(!pid_file.exists());
    }
}
