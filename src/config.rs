//! Bridge configuration — deserialization and validation.
//!
//! Everything the daemon-facing components need (the chronyc executable name,
//! the chrony.conf path, the default server list) is injected here at
//! construction time rather than read from ambient globals, so tests can
//! substitute throwaway paths and stub executables without touching logic.

use crate::error::BridgeError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level bridge configuration, parsed from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// Executable invoked for every daemon query/command. Resolved via PATH.
    #[serde(default = "default_chronyc_command")]
    pub chronyc_command: String,
    /// The daemon's line-oriented config file holding the `allow` directive.
    #[serde(default = "default_conf_path")]
    pub conf_path: PathBuf,
    /// Servers applied by the restore-defaults workflow.
    #[serde(default = "default_servers")]
    pub default_servers: Vec<String>,
}

fn default_chronyc_command() -> String {
    "chronyc".to_string()
}

fn default_conf_path() -> PathBuf {
    PathBuf::from("/etc/chrony/chrony.conf")
}

fn default_servers() -> Vec<String> {
    vec!["pool.ntp.org".to_string()]
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            chronyc_command: default_chronyc_command(),
            conf_path: default_conf_path(),
            default_servers: default_servers(),
        }
    }
}

impl BridgeConfig {
    /// Parse a config from TOML text. Missing fields take their defaults.
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let config: BridgeConfig = toml::from_str(content)
            .map_err(|e| BridgeError::ConfigLoad("<inline>".to_string(), e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file from disk.
    pub async fn load(path: &Path) -> crate::Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| BridgeError::ConfigLoad(path.display().to_string(), e.to_string()))?;
        let config: BridgeConfig = toml::from_str(&content)
            .map_err(|e| BridgeError::ConfigLoad(path.display().to_string(), e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the config, failing fast before any server is started.
    pub fn validate(&self) -> crate::Result<()> {
        if self.chronyc_command.trim().is_empty() {
            return Err(BridgeError::InvalidConfig(
                "chronyc_command must not be empty".to_string(),
            ));
        }

        if self.conf_path.as_os_str().is_empty() {
            return Err(BridgeError::InvalidConfig(
                "conf_path must not be empty".to_string(),
            ));
        }

        if self.default_servers.is_empty() {
            return Err(BridgeError::InvalidConfig(
                "default_servers must not be empty".to_string(),
            ));
        }

        for server in &self.default_servers {
            if server.trim().is_empty() {
                return Err(BridgeError::InvalidConfig(
                    "default_servers must not contain blank entries".to_string(),
                ));
            }
        }

        Ok(())
    }
}
