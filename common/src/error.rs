//! Error taxonomy.
//!
//! [`ConfigError`] and [`CredentialError`] are fatal and stop a run before any
//! device is contacted. [`DeviceError`] is scoped to a single host and is always
//! recorded as that host's failed result.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("inventory file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed inventory file {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no hosts defined in {}", path.display())]
    NoHosts { path: PathBuf },

    #[error("host '{host}' references unknown group '{group}'")]
    UnknownGroup { host: String, group: String },
}

#[derive(Debug, Error)]
pub enum CredentialError {
    /// Stdin is closed or is not something we can prompt on.
    #[error("no interactive input available to read the {0}")]
    InputUnavailable(&'static str),

    #[error("credential prompt interrupted")]
    Interrupted,

    #[error("failed to read credentials: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    #[error("unreachable: {0}")]
    Unreachable(String),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("session error: {0}")]
    Session(String),

    #[error("unsupported platform '{0}'")]
    UnsupportedPlatform(String),
}
