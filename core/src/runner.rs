//! The **task runner**: applies one [`HostTask`] to every host of an inventory.
//!
//! Each host gets its own tokio task, so a failure or even a panic on one host
//! is confined to that host's slot in the [`RunReport`]. In parallel mode a
//! semaphore bounds how many hosts are talking to devices at the same time.
//!
//! The runner adds no timeout of its own. Executors are expected to bound every
//! session and report an expired one as a failure.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use netrun_common::config::RunMode;
use netrun_common::executor::DeviceExecutor;
use netrun_common::inventory::{Host, Inventory};
use netrun_common::result::{RunReport, TaskError, TaskResult};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::tasks::HostTask;

/// Called with the number of hosts finished so far.
pub type ProgressCallback = Arc<dyn Fn(usize) + Send + Sync>;

pub struct TaskRunner {
    executor: Arc<dyn DeviceExecutor>,
    mode: RunMode,
    on_host_done: Option<ProgressCallback>,
}

impl TaskRunner {
    pub fn new(executor: Arc<dyn DeviceExecutor>, mode: RunMode) -> Self {
        Self {
            executor,
            mode,
            on_host_done: None,
        }
    }

    pub fn with_progress(mut self, callback: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.on_host_done = Some(Arc::new(callback));
        self
    }

    /// Runs `task` once per host and waits for all of them.
    ///
    /// The returned report holds exactly one entry per inventory host.
    pub async fn run(&self, inventory: &Inventory, task: Arc<dyn HostTask>) -> RunReport {
        let start_time: Instant = Instant::now();
        info!(
            "Running '{}' on {} hosts ({:?})",
            task.name(),
            inventory.len(),
            self.mode
        );

        let completed: Arc<AtomicUsize> = Arc::new(AtomicUsize::new(0));
        let results: BTreeMap<String, TaskResult> = match self.mode {
            RunMode::Sequential => self.run_sequential(inventory, &task, &completed).await,
            RunMode::Parallel { workers } => {
                self.run_parallel(inventory, &task, &completed, workers.max(1))
                    .await
            }
        };

        RunReport {
            task: task.name().to_string(),
            results,
            elapsed: start_time.elapsed(),
        }
    }

    async fn run_sequential(
        &self,
        inventory: &Inventory,
        task: &Arc<dyn HostTask>,
        completed: &Arc<AtomicUsize>,
    ) -> BTreeMap<String, TaskResult> {
        let mut results: BTreeMap<String, TaskResult> = BTreeMap::new();
        for host in inventory.hosts() {
            let handle: JoinHandle<TaskResult> = self.spawn_host(host, task, completed, None);
            results.insert(host.name.clone(), join_host(&host.name, handle).await);
        }
        results
    }

    async fn run_parallel(
        &self,
        inventory: &Inventory,
        task: &Arc<dyn HostTask>,
        completed: &Arc<AtomicUsize>,
        workers: usize,
    ) -> BTreeMap<String, TaskResult> {
        let semaphore: Arc<Semaphore> = Arc::new(Semaphore::new(workers));

        let handles: Vec<(String, JoinHandle<TaskResult>)> = inventory
            .hosts()
            .map(|host| {
                let handle = self.spawn_host(host, task, completed, Some(semaphore.clone()));
                (host.name.clone(), handle)
            })
            .collect();

        let mut results: BTreeMap<String, TaskResult> = BTreeMap::new();
        for (name, handle) in handles {
            let result: TaskResult = join_host(&name, handle).await;
            results.insert(name, result);
        }
        results
    }

    fn spawn_host(
        &self,
        host: &Host,
        task: &Arc<dyn HostTask>,
        completed: &Arc<AtomicUsize>,
        semaphore: Option<Arc<Semaphore>>,
    ) -> JoinHandle<TaskResult> {
        let host: Host = host.clone();
        let task: Arc<dyn HostTask> = task.clone();
        let executor: Arc<dyn DeviceExecutor> = self.executor.clone();
        let completed: Arc<AtomicUsize> = completed.clone();
        let callback: Option<ProgressCallback> = self.on_host_done.clone();

        tokio::spawn(async move {
            let _permit = match semaphore {
                Some(semaphore) => match semaphore.acquire_owned().await {
                    Ok(permit) => Some(permit),
                    Err(_) => return Err(TaskError::Aborted("worker pool closed".to_string())),
                },
                None => None,
            };

            debug!("{}: starting {}", host.name, task.name());
            let result: TaskResult = task.run(&host, executor.as_ref()).await;
            match &result {
                Ok(_) => debug!("{}: done", host.name),
                Err(e) => debug!("{}: failed: {e}", host.name),
            }

            let done: usize = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(callback) = callback {
                callback(done);
            }
            result
        })
    }
}

async fn join_host(name: &str, handle: JoinHandle<TaskResult>) -> TaskResult {
    match handle.await {
        Ok(result) => result,
        Err(e) => {
            debug!("{name}: task did not complete: {e}");
            Err(TaskError::Aborted(e.to_string()))
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
