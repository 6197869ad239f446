//! Error types for the vmnet daemon supervisor
//!
//! This module defines all error types used throughout the supervisor,
//! grouped by the component that raises them.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the supervisor
#[derive(Error, Debug)]
pub enum VmnetError {
    /// Errors related to session identifiers and directory resolution
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Errors related to configuration loading/parsing
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors related to detaching the daemon
    #[error("Daemon error: {0}")]
    Daemon(#[from] DaemonError),

    /// Errors related to probing or signalling tracked processes
    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    /// Errors raised by the supervised vde_vmnet binary
    #[error("vmnet error: {0}")]
    Supervised(#[from] SupervisedError),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Session identifier and working directory errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid session identifier {id:?}: {reason}")]
    InvalidIdentifier { id: String, reason: String },

    #[error("Failed to resolve working directory: {reason}")]
    DirectoryResolution { reason: String },
}

/// Configuration-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to load configuration file {path}: {reason}")]
    LoadFailed { path: String, reason: String },

    #[error("Invalid address for {field}: {value}")]
    InvalidAddress { field: String, value: String },

    #[error("Configuration validation error: {message}")]
    ValidationError { message: String },
}

/// Daemon detachment errors
#[derive(Error, Debug)]
pub enum DaemonError {
    #[error("Daemon already running with PID {pid} (pid file {})", .pid_file.display())]
    AlreadyRunning { pid: i32, pid_file: PathBuf },

    #[error("Failed to create session directory {}: {source}", .path.display())]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to open log file {}: {source}", .path.display())]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error running colima-vmnet as daemon: {reason}")]
    DetachFailed { reason: String },
}

/// Process probing and signalling errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    #[error("Failed to read PID file {path}: {reason}")]
    PidFileUnreadable { path: String, reason: String },

    #[error("Invalid PID in PID file {path}: {content:?}")]
    InvalidPid { path: String, content: String },

    #[error("Failed to signal process {pid}: {reason}")]
    SignalFailed { pid: i32, reason: String },
}

/// Supervised binary errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SupervisedError {
    #[error("vmnet binary not found: {binary}")]
    BinaryNotFound { binary: String },

    #[error("Failed to spawn vmnet process: {reason}")]
    SpawnFailed { reason: String },

    #[error("vmnet process exited unsuccessfully: {status}")]
    Exited { status: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, VmnetError>;
