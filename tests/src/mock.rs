use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use netrun_common::error::DeviceError;
use netrun_common::executor::{CommandRequest, DeviceExecutor};
use netrun_common::inventory::{Defaults, Host, Inventory};
use serde_json::Value;

/// Answers every request for a host with a canned payload and records what
/// was asked. Hosts without a canned answer are unreachable.
#[derive(Default)]
pub struct MockExecutor {
    answers: HashMap<String, Result<Value, DeviceError>>,
    pub requests: Mutex<Vec<(String, CommandRequest)>>,
}

impl MockExecutor {
    pub fn answer(mut self, host: &str, payload: Value) -> Self {
        self.answers.insert(host.to_string(), Ok(payload));
        self
    }

    pub fn fail(mut self, host: &str, error: DeviceError) -> Self {
        self.answers.insert(host.to_string(), Err(error));
        self
    }

    pub fn requests_for(&self, host: &str) -> Vec<CommandRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == host)
            .map(|(_, request)| request.clone())
            .collect()
    }
}

#[async_trait]
impl DeviceExecutor for MockExecutor {
    async fn execute(&self, host: &Host, request: &CommandRequest) -> Result<Value, DeviceError> {
        self.requests
            .lock()
            .unwrap()
            .push((host.name.clone(), request.clone()));

        self.answers
            .get(&host.name)
            .cloned()
            .unwrap_or_else(|| Err(DeviceError::Unreachable(host.hostname.clone())))
    }
}

pub fn inventory(names: &[&str]) -> Inventory {
    Inventory::new(names.iter().map(|n| Host::new(*n)), Defaults::default())
}
