//! The boundary between the task runner and a real device.
//!
//! Tasks never open sessions themselves: they describe what they need as a
//! [`CommandRequest`] and hand it to a [`DeviceExecutor`]. The executor is
//! responsible for its own timeouts and returns structured JSON shaped like
//! TextFSM rows (for show commands) or a NAPALM ping result.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::DeviceError;
use crate::inventory::Host;

pub const DEFAULT_PING_SIZE: u32 = 100;
pub const DEFAULT_PING_COUNT: u32 = 5;
pub const DEFAULT_PING_TIMEOUT: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandRequest {
    /// Run a show command. With `structured` the executor returns an array of
    /// row objects instead of the raw text.
    Show { command: String, structured: bool },
    Ping(PingRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingRequest {
    pub destination: String,
    /// Datagram size in bytes.
    pub size: u32,
    /// Number of echo requests.
    pub count: u32,
    /// Per-probe timeout in seconds.
    pub timeout: u32,
    pub source: Option<String>,
    pub vrf: Option<String>,
}

impl PingRequest {
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            size: DEFAULT_PING_SIZE,
            count: DEFAULT_PING_COUNT,
            timeout: DEFAULT_PING_TIMEOUT,
            source: None,
            vrf: None,
        }
    }
}

#[async_trait]
pub trait DeviceExecutor: Send + Sync {
    async fn execute(&self, host: &Host, request: &CommandRequest) -> Result<Value, DeviceError>;
}
