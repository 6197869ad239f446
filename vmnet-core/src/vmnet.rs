//! Supervised vde_vmnet process
//!
//! Builds the vde_vmnet command line for a session and runs it to
//! completion on the caller's thread.

use std::ffi::OsString;
use std::os::unix::process::ExitStatusExt;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use nix::sys::signal::Signal;
use tokio::process::Command;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{debug, info, warn};

use crate::config::VmnetConfig;
use crate::error::{SupervisedError, VmnetError};
use crate::session::SessionPaths;

/// Suffix asking vde_vmnet to create the socket and keep it open
const SOCKET_KEEP_OPEN: &str = "[]";

/// A fully specified vde_vmnet invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmnetCommand {
    /// Binary to execute, as configured
    pub binary: PathBuf,
    /// Arguments passed to the binary
    pub args: Vec<OsString>,
}

impl VmnetCommand {
    /// Build the invocation for a session
    pub fn new(config: &VmnetConfig, paths: &SessionPaths) -> Self {
        let mut socket = paths.ptp_file.clone().into_os_string();
        socket.push(SOCKET_KEEP_OPEN);

        let args = vec![
            OsString::from("--vmnet-mode"),
            OsString::from(&config.mode),
            OsString::from("--vmnet-gateway"),
            OsString::from(&config.gateway),
            OsString::from("--vmnet-dhcp-end"),
            OsString::from(&config.dhcp_end),
            OsString::from("--pidfile"),
            paths.vmnet_pid_file.clone().into_os_string(),
            socket,
        ];

        Self {
            binary: config.binary.clone(),
            args,
        }
    }

    /// Resolve the binary, searching `PATH` for bare names
    pub fn resolve_binary(&self) -> Result<PathBuf, SupervisedError> {
        which::which(&self.binary).map_err(|_| SupervisedError::BinaryNotFound {
            binary: self.binary.display().to_string(),
        })
    }

    /// Run the binary and block until it exits
    ///
    /// stdio is inherited, so output lands wherever the caller's output is
    /// redirected. SIGTERM or SIGINT received meanwhile kill the binary and
    /// end the run successfully, letting the caller's cleanup run.
    pub fn run(&self) -> Result<(), VmnetError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_io()
            .build()?;

        runtime.block_on(self.run_async())
    }

    async fn run_async(&self) -> Result<(), VmnetError> {
        let binary = self.resolve_binary()?;
        debug!("Running {} {:?}", binary.display(), self.args);

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        let mut child = Command::new(&binary)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SupervisedError::SpawnFailed {
                reason: format!("{}: {}", binary.display(), e),
            })?;

        if let Some(pid) = child.id() {
            info!("vmnet process started with PID {}", pid);
        }

        let requested = tokio::select! {
            status = child.wait() => return check_status(status?),
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        };

        info!("Received {}, stopping vmnet process", requested);
        if let Err(e) = child.start_kill() {
            warn!("Failed to kill vmnet process: {}", e);
        }
        let status = child.wait().await?;
        debug!("vmnet process exited after {}: {}", requested, status);

        Ok(())
    }
}

/// Map vde_vmnet's exit status to the run's result
///
/// Dying of SIGTERM or SIGINT is a requested stop: `stop` signals vde_vmnet
/// before the daemon, so the daemon usually sees this first.
fn check_status(status: ExitStatus) -> Result<(), VmnetError> {
    let killed_by = status.signal().and_then(|raw| Signal::try_from(raw).ok());

    if status.success() {
        info!("vmnet process exited");
        Ok(())
    } else if matches!(killed_by, Some(Signal::SIGTERM | Signal::SIGINT)) {
        info!("vmnet process stopped: {}", status);
        Ok(())
    } else {
        Err(SupervisedError::Exited {
            status: status.to_string(),
        }
        .into())
    }
}

/// Convenience wrapper building and running the session's invocation
pub fn run(config: &VmnetConfig, paths: &SessionPaths) -> Result<(), VmnetError> {
    VmnetCommand::new(config, paths).run()
}

/// Path of the vde_vmnet socket argument for display purposes
pub fn socket_argument(paths: &SessionPaths) -> String {
    format!("{}{}", paths.ptp_file.display(), SOCKET_KEEP_OPEN)
}
