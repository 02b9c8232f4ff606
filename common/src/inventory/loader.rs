//! Reads the three inventory files and flattens inheritance into [`Host`]s.
//!
//! Every attribute is looked up on the host first, then on its groups
//! (declaration order, depth first through nested groups), then on the
//! defaults. `data` maps are merged key by key with the same precedence.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::host::{DEFAULT_SSH_PORT, DEFAULT_TIMEOUT, Defaults, Host};
use crate::credentials::Password;
use crate::error::ConfigError;

/// Paths of the files making up one inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryFiles {
    pub hosts: PathBuf,
    pub groups: PathBuf,
    pub defaults: PathBuf,
}

impl InventoryFiles {
    /// `site` prefixes the hosts and groups files (`<site>_hosts.yaml`).
    /// The defaults file is shared by every site.
    pub fn locate(dir: &Path, site: Option<&str>) -> Self {
        let prefix: String = match site {
            Some(site) if !site.is_empty() => format!("{site}_"),
            _ => String::new(),
        };

        Self {
            hosts: dir.join(format!("{prefix}hosts.yaml")),
            groups: dir.join(format!("{prefix}groups.yaml")),
            defaults: dir.join("defaults.yaml"),
        }
    }
}

/// Shape shared by host, group and defaults entries.
#[derive(Debug, Default, Deserialize)]
struct Attributes {
    hostname: Option<String>,
    platform: Option<String>,
    port: Option<u16>,
    username: Option<String>,
    password: Option<String>,
    /// Seconds.
    timeout: Option<u64>,
    #[serde(default)]
    groups: Vec<String>,
    #[serde(default)]
    data: BTreeMap<String, Value>,
}

type EntryMap = BTreeMap<String, Option<Attributes>>;

pub(super) fn load(files: &InventoryFiles) -> Result<(Vec<Host>, Defaults), ConfigError> {
    let hosts: EntryMap = read_yaml(&files.hosts, true)?.unwrap_or_default();
    if hosts.is_empty() {
        return Err(ConfigError::NoHosts {
            path: files.hosts.clone(),
        });
    }

    let groups: BTreeMap<String, Attributes> = read_yaml::<EntryMap>(&files.groups, false)?
        .unwrap_or_default()
        .into_iter()
        .map(|(name, attrs)| (name, attrs.unwrap_or_default()))
        .collect();

    let defaults: Attributes = read_yaml(&files.defaults, false)?.unwrap_or_default();

    debug!(
        "Loaded {} hosts and {} groups from {}",
        hosts.len(),
        groups.len(),
        files.hosts.display()
    );

    let resolved: Vec<Host> = hosts
        .into_iter()
        .map(|(name, entry)| resolve_host(name, entry.unwrap_or_default(), &groups, &defaults))
        .collect::<Result<_, _>>()?;

    Ok((resolved, to_defaults(defaults)))
}

fn read_yaml<T: DeserializeOwned>(path: &Path, required: bool) -> Result<Option<T>, ConfigError> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingFile {
                path: path.to_path_buf(),
            });
        }
        debug!("Optional inventory file {} not present", path.display());
        return Ok(None);
    }

    let raw: String = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if raw.trim().is_empty() {
        return Ok(None);
    }

    serde_yaml::from_str::<Option<T>>(&raw).map_err(|source| ConfigError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

fn resolve_host(
    name: String,
    entry: Attributes,
    groups: &BTreeMap<String, Attributes>,
    defaults: &Attributes,
) -> Result<Host, ConfigError> {
    let mut chain: Vec<&Attributes> = vec![&entry];
    let mut seen: HashSet<&str> = HashSet::new();
    collect_groups(&name, &entry.groups, groups, &mut seen, &mut chain)?;

    // Default credentials stay on `Defaults`; they reach hosts through
    // credential resolution so the environment can override them.
    let username: Option<String> = first(&chain, |a| a.username.as_ref());
    let password: Option<Password> = first(&chain, |a| a.password.as_ref()).map(Password::from);
    chain.push(defaults);

    let mut data: BTreeMap<String, Value> = BTreeMap::new();
    for layer in chain.iter().rev() {
        for (key, value) in &layer.data {
            data.insert(key.clone(), value.clone());
        }
    }

    Ok(Host {
        hostname: first(&chain, |a| a.hostname.as_ref()).unwrap_or_else(|| name.clone()),
        platform: first(&chain, |a| a.platform.as_ref()),
        port: first(&chain, |a| a.port.as_ref()).unwrap_or(DEFAULT_SSH_PORT),
        username,
        password,
        timeout: first(&chain, |a| a.timeout.as_ref())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT),
        groups: entry.groups.clone(),
        data,
        name,
    })
}

fn collect_groups<'a>(
    host: &str,
    names: &'a [String],
    groups: &'a BTreeMap<String, Attributes>,
    seen: &mut HashSet<&'a str>,
    chain: &mut Vec<&'a Attributes>,
) -> Result<(), ConfigError> {
    for group in names {
        if !seen.insert(group.as_str()) {
            continue;
        }

        let attrs: &Attributes = groups.get(group).ok_or_else(|| ConfigError::UnknownGroup {
            host: host.to_string(),
            group: group.clone(),
        })?;

        chain.push(attrs);
        collect_groups(host, &attrs.groups, groups, seen, chain)?;
    }
    Ok(())
}

fn first<T: Clone>(chain: &[&Attributes], get: impl Fn(&Attributes) -> Option<&T>) -> Option<T> {
    chain.iter().find_map(|attrs| get(*attrs)).cloned()
}

fn to_defaults(attrs: Attributes) -> Defaults {
    Defaults {
        platform: attrs.platform,
        port: attrs.port,
        username: attrs.username,
        password: attrs.password.map(Password::from),
        timeout: attrs.timeout.map(Duration::from_secs),
        data: attrs.data,
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
