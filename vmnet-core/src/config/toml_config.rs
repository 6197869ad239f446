//! TOML configuration file I/O
//!
//! Loads optional overrides for the vde_vmnet parameters from
//! `vmnet.toml` in the colima base directory.

use crate::config::VmnetConfig;
use crate::error::{ConfigError, VmnetError};
use crate::session;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default configuration file name
const CONFIG_FILE_NAME: &str = "vmnet.toml";

/// Complete TOML configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// vde_vmnet settings
    #[serde(default)]
    pub vmnet: VmnetConfig,
}

impl TomlConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, VmnetError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            VmnetError::Config(ConfigError::LoadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        })?;

        let config: TomlConfig = toml::from_str(&contents)?;
        config.vmnet.validate()?;

        Ok(config)
    }
}

/// Get the default configuration file path
pub fn get_config_path() -> Result<PathBuf, VmnetError> {
    Ok(session::base_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the vmnet configuration from `path`, falling back to defaults
///
/// A missing file is not an error; an unreadable or invalid one is.
pub fn load_config_from(path: &Path) -> Result<VmnetConfig, VmnetError> {
    if !path.exists() {
        debug!("No config file at {}, using defaults", path.display());
        return Ok(VmnetConfig::default());
    }

    debug!("Loading config from {}", path.display());
    Ok(TomlConfig::from_file(path)?.vmnet)
}

/// Load the vmnet configuration from the default location
pub fn load_config() -> Result<VmnetConfig, VmnetError> {
    load_config_from(&get_config_path()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_config_from(&temp_dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, VmnetConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[vmnet]\ngateway = \"192.168.107.1\"\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.gateway, "192.168.107.1");
        assert_eq!(config.mode, "shared");
        assert_eq!(config.dhcp_end, "192.168.106.254");
    }

    #[test]
    fn test_invalid_address_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[vmnet]\ndhcp_end = \"not-an-ip\"\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(
            err,
            VmnetError::Config(ConfigError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[vmnet\n").unwrap();

        assert!(matches!(
            load_config_from(&path).unwrap_err(),
            VmnetError::Toml(_)
        ));
    }
}
