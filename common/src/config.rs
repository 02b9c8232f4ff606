use std::path::PathBuf;

pub const DEFAULT_INVENTORY_DIR: &str = "inventory";
pub const DEFAULT_WORKERS: usize = 10;

/// How hosts are scheduled by the task runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// One host at a time, in inventory order.
    Sequential,
    /// At most `workers` hosts in flight.
    Parallel { workers: usize },
}

pub struct Config {
    /// Directory holding the `hosts`, `groups` and `defaults` YAML files.
    pub inventory_dir: PathBuf,
    /// Optional site prefix for the hosts and groups files.
    pub site: Option<String>,
    /// Keep only hosts whose platform matches.
    pub platform: Option<String>,
    pub workers: usize,
    pub sequential: bool,
    /// Suppress per-host sections, print the summary only.
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inventory_dir: PathBuf::from(DEFAULT_INVENTORY_DIR),
            site: None,
            platform: None,
            workers: DEFAULT_WORKERS,
            sequential: false,
            quiet: false,
        }
    }
}

impl Config {
    pub fn run_mode(&self) -> RunMode {
        if self.sequential || self.workers <= 1 {
            RunMode::Sequential
        } else {
            RunMode::Parallel {
                workers: self.workers,
            }
        }
    }
}
