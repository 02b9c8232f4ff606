//! Steps shared by every command: load the inventory, announce the run,
//! resolve credentials, execute the task and print the results.

use std::sync::Arc;

use anyhow::Context;
use netrun_common::config::Config;
use netrun_common::credentials::{self, Credentials, EnvCredentials};
use netrun_common::executor::DeviceExecutor;
use netrun_common::inventory::Inventory;
use netrun_common::result::RunReport;
use netrun_core::TaskRunner;
use netrun_core::tasks::HostTask;
use tracing::warn;

use crate::nprint;
use crate::terminal::prompt::TerminalPrompt;
use crate::terminal::{print, report, spinner};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn load_inventory(cfg: &Config) -> anyhow::Result<Inventory> {
    let inventory: Inventory = Inventory::load(&cfg.inventory_dir, cfg.site.as_deref())
        .context("could not load the inventory")?;

    let inventory: Inventory = match &cfg.platform {
        Some(platform) => inventory.filter_platform(platform),
        None => inventory,
    };

    if inventory.is_empty() {
        warn!("No hosts left to run against");
    }
    Ok(inventory)
}

/// Opens the kickoff block. It is closed by [`authenticate`].
pub fn kickoff(description: &str, destination: Option<&str>, inventory: &Inventory, cfg: &Config) {
    if cfg.quiet {
        return;
    }
    let timestamp: String = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
    print::render(&report::kickoff(
        description,
        &timestamp,
        destination,
        &inventory.names(),
    ));
}

pub fn authenticate(inventory: &Inventory, cfg: &Config) -> anyhow::Result<Inventory> {
    let creds: Credentials = credentials::resolve(
        inventory.defaults(),
        &EnvCredentials::from_env(),
        &mut TerminalPrompt,
    )
    .context("could not obtain device credentials")?;

    if !cfg.quiet {
        print::rule();
    }
    Ok(inventory.with_credentials(&creds))
}

pub async fn execute(
    inventory: &Inventory,
    task: Arc<dyn HostTask>,
    executor: Arc<dyn DeviceExecutor>,
    cfg: &Config,
) -> RunReport {
    let total: usize = inventory.len();
    let runner: TaskRunner = TaskRunner::new(executor, cfg.run_mode())
        .with_progress(move |done| spinner::report_progress(done, total));

    spinner::start(total);
    let run: RunReport = runner.run(inventory, task).await;
    spinner::finish();
    run
}

/// Prints the per-host sections and the summary, and returns the exit status.
pub fn conclude(run: &RunReport, cfg: &Config) -> u8 {
    if cfg.quiet {
        nprint!();
    } else {
        for (name, result) in &run.results {
            print::render(&report::host_section(name, result));
        }
    }

    print::render(&report::summary(run));
    report::exit_status(run)
}
