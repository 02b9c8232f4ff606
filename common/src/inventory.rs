//! # Inventory
//!
//! The set of managed devices for one run. An [`Inventory`] is an immutable
//! value: filtering or applying credentials returns a new one, so the task
//! runner can share it by reference without any global state.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use crate::credentials::Credentials;
use crate::error::ConfigError;

mod host;
mod loader;

pub use host::{DEFAULT_SSH_PORT, DEFAULT_TIMEOUT, Defaults, Host};
pub use loader::InventoryFiles;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    hosts: BTreeMap<String, Host>,
    defaults: Defaults,
}

impl Inventory {
    pub fn new(hosts: impl IntoIterator<Item = Host>, defaults: Defaults) -> Self {
        Self {
            hosts: hosts.into_iter().map(|h| (h.name.clone(), h)).collect(),
            defaults,
        }
    }

    /// Loads `<dir>/[<site>_]hosts.yaml`, `<dir>/[<site>_]groups.yaml` and
    /// `<dir>/defaults.yaml`. Only the hosts file is required.
    pub fn load(dir: &Path, site: Option<&str>) -> Result<Self, ConfigError> {
        let files: InventoryFiles = InventoryFiles::locate(dir, site);
        let (hosts, defaults) = loader::load(&files)?;
        info!("Inventory loaded: {} hosts", hosts.len());
        Ok(Self::new(hosts, defaults))
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// Hosts ordered by name.
    pub fn hosts(&self) -> impl Iterator<Item = &Host> {
        self.hosts.values()
    }

    pub fn names(&self) -> Vec<&str> {
        self.hosts.keys().map(String::as_str).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Host> {
        self.hosts.get(name)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn filter_platform(&self, platform: &str) -> Self {
        let hosts = self
            .hosts
            .values()
            .filter(|h| h.platform.as_deref() == Some(platform))
            .cloned();
        Self::new(hosts, self.defaults.clone())
    }

    /// Fills in the username and password of every host that has none, and
    /// records them on the defaults.
    pub fn with_credentials(&self, creds: &Credentials) -> Self {
        let hosts = self.hosts.values().cloned().map(|mut host| {
            host.username.get_or_insert_with(|| creds.username.clone());
            host.password.get_or_insert_with(|| creds.password.clone());
            host
        });

        let defaults: Defaults = Defaults {
            username: Some(creds.username.clone()),
            password: Some(creds.password.clone()),
            ..self.defaults.clone()
        };

        Self::new(hosts, defaults)
    }
}
