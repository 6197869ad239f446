//! vmnet daemon lifecycle commands
//!
//! `start` detaches a supervisor that runs vde_vmnet for the session,
//! `stop` signals whatever the session's pid files record, `status`
//! reports on them.

use colored::Colorize;
use tracing::{error, info};

use vmnet_core::config::toml_config::load_config;
use vmnet_core::error::VmnetError;
use vmnet_core::process::{
    is_alive, is_process_running, read_pid, reclaim_stale, terminate_all, SignalTerminator,
    StopReport, Terminator,
};
use vmnet_core::session::{SessionId, SessionPaths};
use vmnet_core::vmnet::{self, socket_argument};
use vmnet_core::LogHandle;

use crate::daemon::process::{DaemonProcess, Detached};

/// Run the start command
///
/// Returns as soon as the daemon is detached. In the daemon itself this
/// blocks until vde_vmnet exits and carries its result.
pub fn run_start(session: &str, logs: &LogHandle) -> Result<(), VmnetError> {
    let session = SessionId::new(session)?;
    let paths = SessionPaths::for_session(&session)?;
    let config = load_config()?;

    let _guard = match DaemonProcess::new(&paths).daemonize(logs)? {
        Detached::Parent => {
            println!(
                "{} vmnet daemon started for session {}",
                "✓".green(),
                session
            );
            return Ok(());
        }
        Detached::Child(guard) => guard,
    };

    reclaim_stale(&paths.socket_artifacts());

    info!("Starting vmnet on {}", socket_argument(&paths));
    let result = vmnet::run(&config, &paths);
    if let Err(ref e) = result {
        error!("vmnet terminated: {}", e);
    }

    result
}

/// Run the stop command
///
/// Only setup failures are errors; termination problems are logged.
pub fn run_stop(session: &str) -> Result<(), VmnetError> {
    let session = SessionId::new(session)?;
    let paths = SessionPaths::for_session(&session)?;

    let report = stop(&paths, &SignalTerminator);
    if report.signalled.is_empty() && report.is_clean() {
        info!("No vmnet processes running for session {}", session);
    }

    Ok(())
}

/// Terminate the supervised binary, then the supervisor
///
/// vde_vmnet exiting normally takes the daemon down too, but the daemon is
/// signalled regardless.
pub fn stop<T: Terminator + ?Sized>(paths: &SessionPaths, terminator: &T) -> StopReport {
    terminate_all(terminator, &paths.tracked_pid_files())
}

/// Observed state of one tracked pid file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessState {
    /// No pid file
    Stopped,
    /// Pid file names a live process
    Running(i32),
    /// Pid file present but its process is gone or unreadable
    Stale,
}

/// Probe one pid file
pub fn probe(pid_file: &std::path::Path) -> ProcessState {
    if !is_alive(pid_file) {
        return ProcessState::Stopped;
    }

    match read_pid(pid_file) {
        Ok(pid) if is_process_running(pid) => ProcessState::Running(pid),
        _ => ProcessState::Stale,
    }
}

/// Run the status command
pub fn run_status(session: &str) -> Result<(), VmnetError> {
    let session = SessionId::new(session)?;
    let paths = SessionPaths::for_session(&session)?;

    println!("Session: {}", session.to_string().bold());
    for (label, pid_file) in [("daemon", &paths.pid_file), ("vmnet", &paths.vmnet_pid_file)] {
        let state = match probe(pid_file) {
            ProcessState::Running(pid) => format!("running (PID {})", pid).green(),
            ProcessState::Stale => "stale pid file".yellow(),
            ProcessState::Stopped => "stopped".red(),
        };
        println!("  {:<7} {}", label, state);
    }
    println!("  {:<7} {}", "log", paths.log_file.display());

    Ok(())
}
