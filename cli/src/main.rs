mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, Commands, bgp, latency};
use netrun_common::config::Config;
use netrun_core::tasks::LatencyCheck;
use tracing::error;

use crate::terminal::logging;

/// Configuration, inventory and credential problems.
const FATAL_EXIT: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);

    let cfg: Config = commands.config();

    let outcome: anyhow::Result<u8> = match commands.command {
        Commands::BgpCount { as_path, .. } => bgp::bgp_count(&as_path, &cfg).await,
        Commands::Latency {
            size,
            repeat,
            ping_timeout,
            source,
            vrf,
            ..
        } => {
            let check = LatencyCheck {
                size,
                repeat,
                timeout: ping_timeout,
                source,
                vrf,
            };
            latency::latency(check, &cfg).await
        }
    };

    match outcome {
        Ok(status) => ExitCode::from(status),
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(FATAL_EXIT)
        }
    }
}
