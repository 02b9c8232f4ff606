//! # Netrun Core
//!
//! * **[`runner`]**: schedules a task across every host of an inventory.
//! * **[`tasks`]**: the BGP network count and the latency check.
//! * **[`ssh`]**: the SSH device executor for Cisco IOS.

pub mod runner;
pub mod ssh;
pub mod tasks;

pub use runner::TaskRunner;
pub use ssh::SshExecutor;
