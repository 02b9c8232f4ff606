pub mod bgp;
pub mod latency;
pub mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use netrun_common::config::{Config, DEFAULT_INVENTORY_DIR, DEFAULT_WORKERS};
use netrun_common::executor::{DEFAULT_PING_COUNT, DEFAULT_PING_SIZE, DEFAULT_PING_TIMEOUT};
use netrun_core::tasks::DEFAULT_AS_PATH_REGEX;

#[derive(Parser)]
#[command(name = "netrun", version)]
#[command(about = "Run show and ping commands across network devices over SSH.")]
pub struct CommandLine {
    /// Directory holding hosts.yaml, groups.yaml and defaults.yaml
    #[arg(short, long, global = true, default_value = DEFAULT_INVENTORY_DIR)]
    pub inventory_dir: PathBuf,

    /// Maximum number of devices contacted at once
    #[arg(short, long, global = true, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Contact one device at a time
    #[arg(long, global = true)]
    pub sequential: bool,

    /// Keep only hosts with this platform
    #[arg(short, long, global = true)]
    pub platform: Option<String>,

    /// Print the final summary only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Show debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Count distinct BGP networks whose AS path matches a regex
    #[command(visible_alias = "bgp", alias = "b")]
    BgpCount {
        /// Site prefix of the hosts and groups files
        site: Option<String>,
        #[arg(long, default_value = DEFAULT_AS_PATH_REGEX)]
        as_path: String,
    },
    /// Ping each host's destination and report loss and round-trip time
    #[command(visible_alias = "ping", alias = "l")]
    Latency {
        /// Site prefix of the hosts and groups files
        site: Option<String>,
        /// Datagram size in bytes
        #[arg(long, default_value_t = DEFAULT_PING_SIZE)]
        size: u32,
        /// Number of probes
        #[arg(long, default_value_t = DEFAULT_PING_COUNT)]
        repeat: u32,
        /// Seconds to wait for each reply
        #[arg(long, default_value_t = DEFAULT_PING_TIMEOUT)]
        ping_timeout: u32,
        /// Source address or interface
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        vrf: Option<String>,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> Config {
        let site: Option<String> = match &self.command {
            Commands::BgpCount { site, .. } | Commands::Latency { site, .. } => site.clone(),
        };

        Config {
            inventory_dir: self.inventory_dir.clone(),
            site,
            platform: self.platform.clone(),
            workers: self.workers,
            sequential: self.sequential,
            quiet: self.quiet,
        }
    }
}
