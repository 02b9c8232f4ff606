//! SSH implementation of [`DeviceExecutor`] for Cisco IOS.
//!
//! Every request opens its own session: sessions are never shared between
//! hosts or requests. libssh2 is blocking, so the work is moved onto tokio's
//! blocking pool.

use async_trait::async_trait;
use netrun_common::error::DeviceError;
use netrun_common::executor::{CommandRequest, DeviceExecutor};
use netrun_common::inventory::Host;
use serde_json::Value;
use tracing::debug;

mod ios;
mod session;

pub const IOS_PLATFORM: &str = "ios";

#[derive(Debug, Clone, Copy, Default)]
pub struct SshExecutor;

impl SshExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DeviceExecutor for SshExecutor {
    async fn execute(&self, host: &Host, request: &CommandRequest) -> Result<Value, DeviceError> {
        // Hosts without a platform are treated as IOS.
        let platform: &str = host.platform.as_deref().unwrap_or(IOS_PLATFORM);
        if platform != IOS_PLATFORM {
            return Err(DeviceError::UnsupportedPlatform(platform.to_string()));
        }

        let command: String = match request {
            CommandRequest::Show { command, .. } => command.clone(),
            CommandRequest::Ping(ping) => ios::ping_command(ping),
        };
        debug!("{}: sending '{command}'", host.name);

        let target: Host = host.clone();
        let output: String = tokio::task::spawn_blocking(move || {
            let session = session::connect(&target)?;
            session::run_command(&session, &command)
        })
        .await
        .map_err(|e| DeviceError::Session(format!("ssh worker failed: {e}")))??;

        match request {
            CommandRequest::Ping(_) => Ok(ios::parse_ping(&output)),
            CommandRequest::Show { command, structured } => {
                if let Some(line) = output.lines().map(str::trim).find(|l| l.starts_with('%')) {
                    return Err(DeviceError::Session(line.to_string()));
                }
                if *structured && ios::is_show_ip_bgp(command) {
                    Ok(ios::parse_show_ip_bgp(&output))
                } else {
                    // No template for this command: hand back the raw text
                    Ok(Value::String(output))
                }
            }
        }
    }
}
