//! Session identity registry
//!
//! Every supervisor invocation is scoped to a session identifier (a colima
//! profile). All files the supervisor and the supervised binary share live in
//! a per-session directory, and their paths are derived here.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::SessionError;

/// Environment variable overriding the base directory (`~/.colima`)
pub const HOME_ENV: &str = "COLIMA_HOME";

const BASE_DIR_NAME: &str = ".colima";
const NETWORK_DIR_NAME: &str = "network";

const DAEMON_PID_FILE: &str = "colima-daemon.pid";
const DAEMON_LOG_FILE: &str = "vmnet.stderr";
const PTP_FILE: &str = "vmnet.ptp";

/// Validated session identifier
///
/// Immutable once constructed; it selects one isolated working directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Validate and wrap a session identifier
    ///
    /// The identifier becomes a single path component, so separators,
    /// NUL bytes and the `.`/`..` components are rejected.
    pub fn new(id: impl Into<String>) -> Result<Self, SessionError> {
        let id = id.into();

        let reason = if id.is_empty() {
            Some("identifier cannot be empty")
        } else if id == "." || id == ".." {
            Some("identifier cannot be a relative directory")
        } else if id.contains('/') || id.contains('\\') {
            Some("identifier cannot contain path separators")
        } else if id.contains('\0') {
            Some("identifier cannot contain NUL bytes")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(SessionError::InvalidIdentifier {
                id,
                reason: reason.to_string(),
            }),
            None => Ok(Self(id)),
        }
    }

    /// Borrow the identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve the base directory all sessions live under
///
/// Returns `$COLIMA_HOME` if set, otherwise `~/.colima`.
pub fn base_dir() -> Result<PathBuf, SessionError> {
    if let Some(dir) = std::env::var_os(HOME_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    dirs::home_dir()
        .map(|home| home.join(BASE_DIR_NAME))
        .ok_or_else(|| SessionError::DirectoryResolution {
            reason: "unable to determine home directory".to_string(),
        })
}

/// Every filesystem path tracked for one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPaths {
    /// Session working directory
    pub dir: PathBuf,
    /// PID file of the detached supervisor
    pub pid_file: PathBuf,
    /// Log file receiving the supervisor's stdout/stderr
    pub log_file: PathBuf,
    /// PTP socket the supervised binary listens on
    pub ptp_file: PathBuf,
    /// PID file written by the supervised binary itself
    pub vmnet_pid_file: PathBuf,
}

impl SessionPaths {
    /// Derive the session paths under an explicit base directory
    ///
    /// Pure: nothing is touched on disk.
    pub fn resolve(base: &Path, session: &SessionId) -> Self {
        let dir = base.join(session.as_str()).join(NETWORK_DIR_NAME);
        let ptp_file = dir.join(PTP_FILE);
        let vmnet_pid_file = companion_pid_file(&ptp_file);

        Self {
            pid_file: dir.join(DAEMON_PID_FILE),
            log_file: dir.join(DAEMON_LOG_FILE),
            ptp_file,
            vmnet_pid_file,
            dir,
        }
    }

    /// Derive the session paths under the default base directory
    pub fn for_session(session: &SessionId) -> Result<Self, SessionError> {
        Ok(Self::resolve(&base_dir()?, session))
    }

    /// Secondary socket created next to the PTP socket by a connected qemu
    pub fn ptp_companion(&self) -> PathBuf {
        let mut name = self.ptp_file.clone().into_os_string();
        name.push("+");
        PathBuf::from(name)
    }

    /// Socket artifacts a new daemon must reclaim before starting
    pub fn socket_artifacts(&self) -> [PathBuf; 2] {
        [self.ptp_file.clone(), self.ptp_companion()]
    }

    /// PID files to terminate on stop, supervised binary first
    pub fn tracked_pid_files(&self) -> [&Path; 2] {
        [self.vmnet_pid_file.as_path(), self.pid_file.as_path()]
    }
}

/// Replace the socket's `.ptp` extension with `.pid`
fn companion_pid_file(ptp_file: &Path) -> PathBuf {
    ptp_file.with_extension("pid")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: &str) -> SessionId {
        SessionId::new(id).unwrap()
    }

    #[test]
    fn test_resolve_layout() {
        let paths = SessionPaths::resolve(Path::new("/base"), &session("dev"));

        assert_eq!(paths.dir, PathBuf::from("/base/dev/network"));
        assert_eq!(paths.pid_file, PathBuf::from("/base/dev/network/colima-daemon.pid"));
        assert_eq!(paths.log_file, PathBuf::from("/base/dev/network/vmnet.stderr"));
        assert_eq!(paths.ptp_file, PathBuf::from("/base/dev/network/vmnet.ptp"));
        assert_eq!(paths.vmnet_pid_file, PathBuf::from("/base/dev/network/vmnet.pid"));
        assert_eq!(paths.ptp_companion(), PathBuf::from("/base/dev/network/vmnet.ptp+"));
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let first = SessionPaths::resolve(Path::new("/base"), &session("dev"));
        let second = SessionPaths::resolve(Path::new("/base"), &session("dev"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let dev = SessionPaths::resolve(Path::new("/base"), &session("dev"));
        let prod = SessionPaths::resolve(Path::new("/base"), &session("prod"));
        assert_ne!(dev.dir, prod.dir);
        assert_ne!(dev.pid_file, prod.pid_file);
    }

    #[test]
    fn test_tracked_pid_files_order() {
        let paths = SessionPaths::resolve(Path::new("/base"), &session("dev"));
        let tracked = paths.tracked_pid_files();
        assert_eq!(tracked[0], paths.vmnet_pid_file.as_path());
        assert_eq!(tracked[1], paths.pid_file.as_path());
    }

    #[test]
    fn test_invalid_identifiers() {
        for id in ["", ".", "..", "a/b", "a\\b", "a\0b"] {
            assert!(
                matches!(
                    SessionId::new(id),
                    Err(SessionError::InvalidIdentifier { .. })
                ),
                "{:?} should be rejected",
                id
            );
        }
    }

    #[test]
    fn test_identifier_display() {
        assert_eq!(session("colima").to_string(), "colima");
    }
}
