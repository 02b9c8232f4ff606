use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::Value;

use crate::credentials::Password;

pub const DEFAULT_SSH_PORT: u16 = 22;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A managed device with every inherited attribute already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Host {
    /// Inventory key, used in every report line.
    pub name: String,
    /// Address used to connect. Falls back to `name`.
    pub hostname: String,
    pub platform: Option<String>,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<Password>,
    /// Connect and per-command timeout enforced by the executor.
    pub timeout: Duration,
    /// Groups listed directly on the host.
    pub groups: Vec<String>,
    /// Free-form host variables, e.g. `dest` for the latency check.
    pub data: BTreeMap<String, Value>,
}

impl Host {
    pub fn new(name: impl Into<String>) -> Self {
        let name: String = name.into();
        Self {
            hostname: name.clone(),
            name,
            platform: None,
            port: DEFAULT_SSH_PORT,
            username: None,
            password: None,
            timeout: DEFAULT_TIMEOUT,
            groups: Vec::new(),
            data: BTreeMap::new(),
        }
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Reads a scalar host variable as text.
    pub fn var(&self, key: &str) -> Option<String> {
        scalar_to_string(self.data.get(key)?)
    }
}

/// Fallback values for hosts that do not define their own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Defaults {
    pub platform: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<Password>,
    pub timeout: Option<Duration>,
    pub data: BTreeMap<String, Value>,
}

impl Defaults {
    pub fn var(&self, key: &str) -> Option<String> {
        scalar_to_string(self.data.get(key)?)
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
