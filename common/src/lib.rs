//! # Netrun Common
//!
//! Shared building blocks for every `netrun` crate:
//!
//! * **[`inventory`]**: hosts, groups and defaults loaded from YAML.
//! * **[`credentials`]**: username/password resolution with an injectable prompt.
//! * **[`executor`]**: the boundary trait for talking to a device.
//! * **[`result`]**: per-host task outcomes and the run-level report.
//! * **[`error`]**: the error taxonomy.
//! * **[`config`]**: run configuration assembled by the CLI.

pub mod config;
pub mod credentials;
pub mod error;
pub mod executor;
pub mod inventory;
pub mod result;
