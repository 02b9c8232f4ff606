use std::collections::BTreeSet;

use async_trait::async_trait;
use netrun_common::executor::{CommandRequest, DeviceExecutor};
use netrun_common::inventory::Host;
use netrun_common::result::{TaskError, TaskOutput, TaskResult};
use serde_json::Value;

use super::HostTask;

/// Routes originated by AS 65513.
pub const DEFAULT_AS_PATH_REGEX: &str = "_65513$";

/// Counts the distinct BGP networks whose AS path matches a regex.
#[derive(Debug, Clone)]
pub struct BgpNetworkCount {
    as_path_regex: String,
}

impl BgpNetworkCount {
    pub fn new(as_path_regex: impl Into<String>) -> Self {
        Self {
            as_path_regex: as_path_regex.into(),
        }
    }

    pub fn command(&self) -> String {
        format!("show ip bgp regexp {}", self.as_path_regex)
    }
}

impl Default for BgpNetworkCount {
    fn default() -> Self {
        Self::new(DEFAULT_AS_PATH_REGEX)
    }
}

#[async_trait]
impl HostTask for BgpNetworkCount {
    fn name(&self) -> &'static str {
        "bgp-count"
    }

    async fn run(&self, host: &Host, executor: &dyn DeviceExecutor) -> TaskResult {
        let request = CommandRequest::Show {
            command: self.command(),
            structured: true,
        };
        let rows: Value = executor.execute(host, &request).await?;
        Ok(TaskOutput::Networks(distinct_networks(&rows)?))
    }
}

/// A prefix with several paths shows up once per path, so rows are
/// deduplicated by their `network` field.
pub fn distinct_networks(rows: &Value) -> Result<BTreeSet<String>, TaskError> {
    let rows: &Vec<Value> = rows
        .as_array()
        .ok_or_else(|| TaskError::Parse("expected a list of BGP rows".to_string()))?;

    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            row.get("network")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| TaskError::Parse(format!("BGP row {idx} has no 'network' field")))
        })
        .collect()
}
