//! Configuration module
//!
//! Fixed operating parameters of the supervised vde_vmnet binary.

use std::net::Ipv4Addr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub mod toml_config;

/// Default location of the bundled vde_vmnet binary
pub const DEFAULT_BINARY: &str = "/opt/colima/bin/vde_vmnet";
/// Default vmnet mode
pub const DEFAULT_MODE: &str = "shared";
/// Default gateway address handed to guests
pub const DEFAULT_GATEWAY: &str = "192.168.106.1";
/// Default last address of the DHCP range
pub const DEFAULT_DHCP_END: &str = "192.168.106.254";

/// vde_vmnet operating parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VmnetConfig {
    /// Path or bare name of the vde_vmnet binary
    pub binary: PathBuf,

    /// Value passed to `--vmnet-mode`
    pub mode: String,

    /// Value passed to `--vmnet-gateway`
    pub gateway: String,

    /// Value passed to `--vmnet-dhcp-end`
    pub dhcp_end: String,
}

impl VmnetConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.binary.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Binary cannot be empty".to_string(),
            });
        }

        if self.mode.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Mode cannot be empty".to_string(),
            });
        }

        let gateway = parse_ipv4("gateway", &self.gateway)?;
        let dhcp_end = parse_ipv4("dhcp_end", &self.dhcp_end)?;

        if gateway == dhcp_end {
            return Err(ConfigError::ValidationError {
                message: "DHCP range end cannot equal the gateway".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for VmnetConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_BINARY),
            mode: DEFAULT_MODE.to_string(),
            gateway: DEFAULT_GATEWAY.to_string(),
            dhcp_end: DEFAULT_DHCP_END.to_string(),
        }
    }
}

fn parse_ipv4(field: &str, value: &str) -> Result<Ipv4Addr, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidAddress {
        field: field.to_string(),
        value: value.to_string(),
    })
}
