//! Per-host task outcomes and the report of a whole run.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use crate::error::DeviceError;

/// Ping statistics for one host.
#[derive(Debug, Clone, PartialEq)]
pub struct LatencyStats {
    pub probes_sent: u64,
    pub packet_loss: u64,
    /// Average round-trip time, in the unit the device reported (ms on IOS).
    pub rtt_avg: f64,
    /// `packet_loss / probes_sent`, in `0.0..=1.0`.
    pub loss_ratio: f64,
}

impl LatencyStats {
    pub fn new(probes_sent: u64, packet_loss: u64, rtt_avg: f64) -> Self {
        let loss_ratio: f64 = if probes_sent == 0 {
            0.0
        } else {
            packet_loss as f64 / probes_sent as f64
        };

        Self {
            probes_sent,
            packet_loss,
            rtt_avg,
            loss_ratio,
        }
    }

    pub fn loss_percent(&self) -> f64 {
        self.loss_ratio * 100.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutput {
    /// Distinct network prefixes.
    Networks(BTreeSet<String>),
    Latency(LatencyStats),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TaskError {
    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error("unexpected output: {0}")]
    Parse(String),

    /// The raw error payload returned by the device.
    #[error("ping failed: {0}")]
    Ping(Value),

    #[error("missing host variable '{0}'")]
    MissingVariable(String),

    #[error("task aborted: {0}")]
    Aborted(String),
}

pub type TaskResult = Result<TaskOutput, TaskError>;

/// Everything a run produced, keyed by host name.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub task: String,
    pub results: BTreeMap<String, TaskResult>,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn failed_hosts(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|(_, result)| result.is_err())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        self.results.values().any(Result::is_err)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
