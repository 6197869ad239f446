//! Stale socket reclamation

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

/// Best-effort removal of socket artifacts left by a previous run
///
/// Entries that exist and are not directories are deleted. Missing paths
/// are skipped and removal failures are only logged; if a path really
/// cannot be reused, vde_vmnet's own bind reports it.
pub fn reclaim_stale<P: AsRef<Path>>(paths: &[P]) {
    for path in paths {
        let path = path.as_ref();

        match fs::symlink_metadata(path) {
            Ok(meta) if meta.is_dir() => {
                debug!("Leaving directory {} in place", path.display());
            }
            Ok(_) => match fs::remove_file(path) {
                Ok(()) => debug!("Removed stale socket {}", path.display()),
                Err(e) => warn!("Failed to remove stale socket {}: {}", path.display(), e),
            },
            Err(_) => {}
        }
    }
}
