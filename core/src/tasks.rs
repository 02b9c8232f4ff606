//! Units of work applied to a single host.
//!
//! A task builds a [`CommandRequest`](netrun_common::executor::CommandRequest),
//! hands it to the executor and turns the structured answer into a
//! [`TaskOutput`](netrun_common::result::TaskOutput). Tasks hold only their own
//! settings, never per-run state, so one instance is shared by every host.

use async_trait::async_trait;
use netrun_common::executor::DeviceExecutor;
use netrun_common::inventory::Host;
use netrun_common::result::TaskResult;

mod bgp;
mod latency;

pub use bgp::{BgpNetworkCount, DEFAULT_AS_PATH_REGEX, distinct_networks};
pub use latency::{DEST_VAR, LatencyCheck, latency_from_ping};

#[async_trait]
pub trait HostTask: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, host: &Host, executor: &dyn DeviceExecutor) -> TaskResult;
}
