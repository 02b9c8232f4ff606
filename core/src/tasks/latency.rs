use async_trait::async_trait;
use netrun_common::executor::{
    CommandRequest, DEFAULT_PING_COUNT, DEFAULT_PING_SIZE, DEFAULT_PING_TIMEOUT, DeviceExecutor,
    PingRequest,
};
use netrun_common::inventory::Host;
use netrun_common::result::{LatencyStats, TaskError, TaskOutput, TaskResult};
use serde_json::Value;

use super::HostTask;

/// Host variable naming the ping destination. Inherited from the defaults
/// file when the host does not set it.
pub const DEST_VAR: &str = "dest";

/// Pings the host's `dest` and reports loss and average round-trip time.
#[derive(Debug, Clone)]
pub struct LatencyCheck {
    pub size: u32,
    pub repeat: u32,
    pub timeout: u32,
    pub source: Option<String>,
    pub vrf: Option<String>,
}

impl Default for LatencyCheck {
    fn default() -> Self {
        Self {
            size: DEFAULT_PING_SIZE,
            repeat: DEFAULT_PING_COUNT,
            timeout: DEFAULT_PING_TIMEOUT,
            source: None,
            vrf: None,
        }
    }
}

impl LatencyCheck {
    pub fn request_for(&self, host: &Host) -> Result<PingRequest, TaskError> {
        let destination: String = host
            .var(DEST_VAR)
            .ok_or_else(|| TaskError::MissingVariable(DEST_VAR.to_string()))?;

        Ok(PingRequest {
            destination,
            size: self.size,
            count: self.repeat,
            timeout: self.timeout,
            source: self.source.clone(),
            vrf: self.vrf.clone(),
        })
    }
}

#[async_trait]
impl HostTask for LatencyCheck {
    fn name(&self) -> &'static str {
        "latency"
    }

    async fn run(&self, host: &Host, executor: &dyn DeviceExecutor) -> TaskResult {
        let request = CommandRequest::Ping(self.request_for(host)?);
        let payload: Value = executor.execute(host, &request).await?;
        Ok(TaskOutput::Latency(latency_from_ping(&payload)?))
    }
}

/// Reads a NAPALM-style ping result. Anything without a `success` key is the
/// device's error payload and is kept verbatim.
pub fn latency_from_ping(payload: &Value) -> Result<LatencyStats, TaskError> {
    let success: &Value = match payload.get("success") {
        Some(success) => success,
        None => return Err(TaskError::Ping(payload.clone())),
    };

    let probes_sent: u64 = count_field(success, "probes_sent")?;
    let packet_loss: u64 = count_field(success, "packet_loss")?;
    let rtt_avg: f64 = success
        .get("rtt_avg")
        .and_then(Value::as_f64)
        .ok_or_else(|| TaskError::Parse("ping result has no 'rtt_avg'".to_string()))?;

    Ok(LatencyStats::new(probes_sent, packet_loss, rtt_avg))
}

fn count_field(success: &Value, key: &str) -> Result<u64, TaskError> {
    success
        .get(key)
        .and_then(Value::as_u64)
        .ok_or_else(|| TaskError::Parse(format!("ping result has no '{key}'")))
}
