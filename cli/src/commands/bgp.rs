use std::sync::Arc;

use netrun_common::config::Config;
use netrun_common::inventory::Inventory;
use netrun_common::result::{RunReport, TaskOutput};
use netrun_core::SshExecutor;
use netrun_core::tasks::BgpNetworkCount;
use tracing::debug;

use super::run;
use crate::terminal::print;

pub async fn bgp_count(as_path: &str, cfg: &Config) -> anyhow::Result<u8> {
    let inventory: Inventory = run::load_inventory(cfg)?;
    if !cfg.quiet {
        print::header("bgp network count");
    }

    run::kickoff(
        &format!("Counting BGP networks with AS path {as_path}"),
        None,
        &inventory,
        cfg,
    );
    let inventory: Inventory = run::authenticate(&inventory, cfg)?;

    let task = Arc::new(BgpNetworkCount::new(as_path));
    let report: RunReport = run::execute(&inventory, task, Arc::new(SshExecutor::new()), cfg).await;

    log_networks(&report);
    Ok(run::conclude(&report, cfg))
}

fn log_networks(report: &RunReport) {
    for (name, result) in &report.results {
        if let Ok(TaskOutput::Networks(networks)) = result {
            for network in networks {
                debug!("{name}: {network}");
            }
        }
    }
}
