use std::collections::BTreeSet;
use std::sync::Arc;

use netrun_common::config::RunMode;
use netrun_common::error::DeviceError;
use netrun_common::executor::CommandRequest;
use netrun_common::inventory::Inventory;
use netrun_common::result::{RunReport, TaskError, TaskOutput};
use netrun_core::TaskRunner;
use netrun_core::tasks::BgpNetworkCount;
use serde_json::{Value, json};

use crate::mock::{MockExecutor, inventory};

/*************************************************************
                        Fixtures
**************************************************************/

fn rows() -> Value {
    json!([
        { "status": "*>", "network": "10.0.0.0/8", "next_hop": "192.168.1.1", "path": "65513 i" },
        { "status": "*",  "network": "10.0.0.0/8", "next_hop": "192.168.1.2", "path": "65001 65513 i" },
        { "status": "*>", "network": "20.0.0.0/8", "next_hop": "192.168.1.1", "path": "65513 i" },
    ])
}

fn healthy(names: &[&str]) -> MockExecutor {
    names
        .iter()
        .fold(MockExecutor::default(), |mock, name| mock.answer(name, rows()))
}

async fn run(mock: MockExecutor, inventory: &Inventory, mode: RunMode) -> RunReport {
    TaskRunner::new(Arc::new(mock), mode)
        .run(inventory, Arc::new(BgpNetworkCount::default()))
        .await
}

/*************************************************************
                          Tests
**************************************************************/

#[tokio::test]
async fn every_host_gets_exactly_one_result() {
    let names = ["r1", "r2", "r3", "r4", "r5", "r6", "r7"];
    let inventory: Inventory = inventory(&names);

    for mode in [RunMode::Sequential, RunMode::Parallel { workers: 3 }] {
        let report: RunReport = run(healthy(&names), &inventory, mode).await;
        assert_eq!(report.len(), names.len(), "wrong cardinality in {mode:?}");
        assert!(!report.has_failures());
    }
}

#[tokio::test]
async fn duplicate_rows_count_once() {
    let report: RunReport = run(
        healthy(&["r1"]),
        &inventory(&["r1"]),
        RunMode::Sequential,
    )
    .await;

    assert_eq!(
        report.results["r1"],
        Ok(TaskOutput::Networks(BTreeSet::from([
            "10.0.0.0/8".to_string(),
            "20.0.0.0/8".to_string(),
        ])))
    );
}

/// One unreachable device fails alone; the others still report.
#[tokio::test]
async fn failing_host_is_the_only_failure() {
    let mock: MockExecutor = healthy(&["r1", "r3"]).fail(
        "r2",
        DeviceError::Authentication("r2 rejected admin".to_string()),
    );

    let report: RunReport = run(
        mock,
        &inventory(&["r1", "r2", "r3"]),
        RunMode::Parallel { workers: 10 },
    )
    .await;

    assert_eq!(report.len(), 3);
    assert_eq!(report.failed_hosts(), vec!["r2"]);
    assert!(matches!(
        report.results["r2"],
        Err(TaskError::Device(DeviceError::Authentication(_)))
    ));
}

#[tokio::test]
async fn identical_runs_produce_identical_results() {
    let names = ["r1", "r2", "r3"];
    let inventory: Inventory = inventory(&names);

    let first: RunReport = run(healthy(&names), &inventory, RunMode::Parallel { workers: 2 }).await;
    let second: RunReport = run(healthy(&names), &inventory, RunMode::Parallel { workers: 2 }).await;

    assert_eq!(first.results, second.results);
}

#[tokio::test]
async fn task_sends_structured_regexp_command() {
    let mock = Arc::new(healthy(&["r1"]));
    TaskRunner::new(mock.clone(), RunMode::Sequential)
        .run(&inventory(&["r1"]), Arc::new(BgpNetworkCount::new("_65000$")))
        .await;

    assert_eq!(
        mock.requests_for("r1"),
        vec![CommandRequest::Show {
            command: "show ip bgp regexp _65000$".to_string(),
            structured: true,
        }]
    );
}
