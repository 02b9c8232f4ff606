use std::sync::Arc;

use netrun_common::config::Config;
use netrun_common::inventory::Inventory;
use netrun_common::result::RunReport;
use netrun_core::SshExecutor;
use netrun_core::tasks::{DEST_VAR, LatencyCheck};

use super::run;
use crate::terminal::print;

pub async fn latency(check: LatencyCheck, cfg: &Config) -> anyhow::Result<u8> {
    let inventory: Inventory = run::load_inventory(cfg)?;
    if !cfg.quiet {
        print::header("latency check");
    }

    let destination: Option<String> = inventory.defaults().var(DEST_VAR);
    run::kickoff(
        &format!(
            "Pinging with {} probes of {} bytes",
            check.repeat, check.size
        ),
        destination.as_deref(),
        &inventory,
        cfg,
    );
    let inventory: Inventory = run::authenticate(&inventory, cfg)?;

    let report: RunReport =
        run::execute(&inventory, Arc::new(check), Arc::new(SshExecutor::new()), cfg).await;

    Ok(run::conclude(&report, cfg))
}
