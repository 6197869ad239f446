//! Tests for session path resolution against the environment

use std::path::PathBuf;

use vmnet_core::config::toml_config::get_config_path;
use vmnet_core::session::{base_dir, SessionId, SessionPaths, HOME_ENV};

// The only test in this binary that touches the process environment.
#[test]
fn test_for_session_honours_colima_home() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    std::env::set_var(HOME_ENV, temp_dir.path());

    let session = SessionId::new("dev").unwrap();
    let first = SessionPaths::for_session(&session).unwrap();
    let second = SessionPaths::for_session(&session).unwrap();

    assert_eq!(base_dir().unwrap(), temp_dir.path());
    assert_eq!(first, second);
    assert_eq!(first.dir, temp_dir.path().join("dev").join("network"));
    assert_eq!(get_config_path().unwrap(), temp_dir.path().join("vmnet.toml"));
    // Resolution has no side effects
    assert!(!first.dir.exists());

    std::env::remove_var(HOME_ENV);
    let default_dir = base_dir().unwrap();
    assert!(default_dir.ends_with(PathBuf::from(".colima")));
}
