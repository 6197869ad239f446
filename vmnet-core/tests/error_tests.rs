//! Unit tests for error types and conversions

use std::path::PathBuf;

use vmnet_core::error::{
    ConfigError, DaemonError, ProcessError, SessionError, SupervisedError, VmnetError,
};

#[test]
fn test_already_running_display() {
    let error = DaemonError::AlreadyRunning {
        pid: 4242,
        pid_file: PathBuf::from("/tmp/colima-daemon.pid"),
    };
    assert_eq!(
        error.to_string(),
        "Daemon already running with PID 4242 (pid file /tmp/colima-daemon.pid)"
    );
}

#[test]
fn test_directory_resolution_display() {
    let error = SessionError::DirectoryResolution {
        reason: "unable to determine home directory".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Failed to resolve working directory: unable to determine home directory"
    );
}

#[test]
fn test_signal_failed_display() {
    let error = ProcessError::SignalFailed {
        pid: 12,
        reason: "ESRCH: No such process".to_string(),
    };
    assert_eq!(
        error.to_string(),
        "Failed to signal process 12: ESRCH: No such process"
    );
}

#[test]
fn test_vmnet_error_from_session() {
    let error: VmnetError = SessionError::InvalidIdentifier {
        id: "a/b".to_string(),
        reason: "identifier cannot contain path separators".to_string(),
    }
    .into();
    assert!(matches!(error, VmnetError::Session(_)));
}

#[test]
fn test_vmnet_error_from_supervised() {
    let error: VmnetError = SupervisedError::Exited {
        status: "exit status: 1".to_string(),
    }
    .into();
    assert_eq!(
        error.to_string(),
        "vmnet error: vmnet process exited unsuccessfully: exit status: 1"
    );
}

#[test]
fn test_vmnet_error_from_config() {
    let error: VmnetError = ConfigError::ValidationError {
        message: "Mode cannot be empty".to_string(),
    }
    .into();
    assert!(matches!(error, VmnetError::Config(_)));
}

#[test]
fn test_vmnet_error_from_io() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error: VmnetError = io_error.into();
    assert!(matches!(error, VmnetError::Io(_)));
}
