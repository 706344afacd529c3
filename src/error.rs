//! Error types for chrony-bridge operations.
//!
//! Deliberately small: a non-zero exit from chronyc is expected, recoverable
//! data and is carried inside `CommandOutput`, not here. Conf-file I/O
//! failures are swallowed into boolean results by `ConfEditor`. What remains
//! is configuration validation and request validation.

use thiserror::Error;

/// Main error type for chrony-bridge operations
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Invalid bridge configuration value
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Config file could not be read or parsed
    #[error("failed to load config from '{0}': {1}")]
    ConfigLoad(String, String),

    /// Replace-servers workflow called with an empty server list
    #[error("servers must be a non-empty list")]
    EmptyServerList,
}

/// Result type alias for chrony-bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;
