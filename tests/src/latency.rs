use std::sync::Arc;

use netrun_common::config::RunMode;
use netrun_common::executor::{CommandRequest, PingRequest};
use netrun_common::inventory::{Defaults, Host, Inventory};
use netrun_common::result::{RunReport, TaskError, TaskOutput};
use netrun_core::TaskRunner;
use netrun_core::tasks::{DEST_VAR, LatencyCheck};
use serde_json::json;

use crate::mock::MockExecutor;

fn pinging(names: &[&str]) -> Inventory {
    Inventory::new(
        names
            .iter()
            .map(|n| Host::new(*n).with_var(DEST_VAR, "2.2.2.2")),
        Defaults::default(),
    )
}

async fn run(mock: Arc<MockExecutor>, inventory: &Inventory) -> RunReport {
    TaskRunner::new(mock, RunMode::Parallel { workers: 4 })
        .run(inventory, Arc::new(LatencyCheck::default()))
        .await
}

#[tokio::test]
async fn ping_statistics_are_reported_as_ratio() {
    let mock = MockExecutor::default().answer(
        "r1",
        json!({ "success": { "probes_sent": 100, "packet_loss": 5, "rtt_avg": 12.3 } }),
    );

    let report: RunReport = run(Arc::new(mock), &pinging(&["r1"])).await;

    match &report.results["r1"] {
        Ok(TaskOutput::Latency(stats)) => {
            assert_eq!(stats.probes_sent, 100);
            assert_eq!(stats.packet_loss, 5);
            assert_eq!(stats.rtt_avg, 12.3);
            assert!((stats.loss_ratio - 0.05).abs() < 1e-9);
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

/// A device error payload fails that host without stopping the run.
#[tokio::test]
async fn payload_without_success_fails_host() {
    let error = json!({ "error": "% Unrecognized host or address" });
    let mock = MockExecutor::default()
        .answer("r1", error.clone())
        .answer(
            "r2",
            json!({ "success": { "probes_sent": 5, "packet_loss": 0, "rtt_avg": 1.0 } }),
        );

    let report: RunReport = run(Arc::new(mock), &pinging(&["r1", "r2"])).await;

    assert_eq!(report.len(), 2);
    assert_eq!(report.results["r1"], Err(TaskError::Ping(error)));
    assert!(report.results["r2"].is_ok());
}

#[tokio::test]
async fn host_without_destination_is_never_contacted() {
    let mock = Arc::new(MockExecutor::default());
    let inventory: Inventory = Inventory::new([Host::new("r1")], Defaults::default());

    let report: RunReport = run(mock.clone(), &inventory).await;

    assert_eq!(
        report.results["r1"],
        Err(TaskError::MissingVariable(DEST_VAR.to_string()))
    );
    assert!(mock.requests_for("r1").is_empty());
}

#[tokio::test]
async fn ping_request_carries_check_settings() {
    let mock = Arc::new(MockExecutor::default());
    let check = LatencyCheck {
        size: 1000,
        repeat: 1000,
        vrf: Some("MGMT".to_string()),
        ..LatencyCheck::default()
    };

    TaskRunner::new(mock.clone(), RunMode::Sequential)
        .run(&pinging(&["r1"]), Arc::new(check))
        .await;

    let mut expected: PingRequest = PingRequest::new("2.2.2.2");
    expected.size = 1000;
    expected.count = 1000;
    expected.vrf = Some("MGMT".to_string());
    assert_eq!(mock.requests_for("r1"), vec![CommandRequest::Ping(expected)]);
}
