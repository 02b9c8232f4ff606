use std::fs;
use std::path::Path;
use std::sync::Arc;

use netrun_common::config::RunMode;
use netrun_common::credentials::{self, CredentialPrompt, Credentials, EnvCredentials, Password};
use netrun_common::error::{ConfigError, CredentialError};
use netrun_common::executor::CommandRequest;
use netrun_common::inventory::Inventory;
use netrun_common::result::{RunReport, TaskOutput};
use netrun_core::TaskRunner;
use netrun_core::tasks::LatencyCheck;
use serde_json::json;
use tempfile::TempDir;

use crate::mock::MockExecutor;

/// Fails the test if anything asks for input.
struct NoPrompt;

impl CredentialPrompt for NoPrompt {
    fn announce(&mut self) {
        panic!("credentials were complete, no prompt expected");
    }

    fn username(&mut self) -> Result<String, CredentialError> {
        panic!("username prompt not expected");
    }

    fn password(&mut self) -> Result<Password, CredentialError> {
        panic!("password prompt not expected");
    }
}

fn write(dir: &Path, file: &str, content: &str) {
    fs::write(dir.join(file), content).unwrap();
}

fn site_inventory() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "dc1_hosts.yaml",
        "r1:\n  hostname: 10.0.0.1\n  groups: [core]\n\
         r2:\n  hostname: 10.0.0.2\n  groups: [core]\n  data:\n    dest: 3.3.3.3\n",
    );
    write(dir.path(), "dc1_groups.yaml", "core:\n  platform: ios\n  timeout: 10\n");
    write(
        dir.path(),
        "defaults.yaml",
        "username: admin\npassword: secret\ndata:\n  dest: 2.2.2.2\n",
    );
    write(dir.path(), "hosts.yaml", "other:\n  hostname: 10.9.9.9\n");
    dir
}

#[test]
fn site_prefix_selects_site_files() {
    let dir: TempDir = site_inventory();

    let site: Inventory = Inventory::load(dir.path(), Some("dc1")).unwrap();
    assert_eq!(site.names(), vec!["r1", "r2"]);
    assert_eq!(site.get("r1").unwrap().platform.as_deref(), Some("ios"));

    let plain: Inventory = Inventory::load(dir.path(), None).unwrap();
    assert_eq!(plain.names(), vec!["other"]);
}

#[test]
fn unknown_site_is_a_config_error() {
    let dir: TempDir = site_inventory();
    assert!(matches!(
        Inventory::load(dir.path(), Some("dc9")),
        Err(ConfigError::MissingFile { .. })
    ));
}

/// Defaults carry both credentials, so the run never needs a terminal.
#[tokio::test]
async fn load_authenticate_and_run_without_prompt() {
    let dir: TempDir = site_inventory();
    let inventory: Inventory = Inventory::load(dir.path(), Some("dc1")).unwrap();

    let creds: Credentials = credentials::resolve(
        inventory.defaults(),
        &EnvCredentials::default(),
        &mut NoPrompt,
    )
    .unwrap();
    assert_eq!(creds.username, "admin");
    let inventory: Inventory = inventory.with_credentials(&creds);

    let stats = json!({ "success": { "probes_sent": 5, "packet_loss": 0, "rtt_avg": 4.0 } });
    let mock = Arc::new(
        MockExecutor::default()
            .answer("r1", stats.clone())
            .answer("r2", stats),
    );

    let report: RunReport = TaskRunner::new(mock.clone(), RunMode::Parallel { workers: 2 })
        .run(&inventory, Arc::new(LatencyCheck::default()))
        .await;

    assert!(!report.has_failures());
    assert!(matches!(report.results["r1"], Ok(TaskOutput::Latency(_))));

    let destination = |host: &str| match mock.requests_for(host).as_slice() {
        [CommandRequest::Ping(request)] => request.destination.clone(),
        other => panic!("unexpected requests: {other:?}"),
    };
    assert_eq!(destination("r1"), "2.2.2.2");
    assert_eq!(destination("r2"), "3.3.3.3");

    let r1 = inventory.get("r1").unwrap();
    assert_eq!(r1.username.as_deref(), Some("admin"));
    assert_eq!(r1.password.as_ref().map(Password::expose), Some("secret"));
}

/// Environment credentials beat the defaults file, but never a username or
/// password set on the host or one of its groups.
#[test]
fn environment_credentials_reach_hosts_without_their_own() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "hosts.yaml",
        "r1:\n  hostname: 10.0.0.1\n\
         r2:\n  hostname: 10.0.0.2\n  groups: [lab]\n\
         r3:\n  hostname: 10.0.0.3\n  username: local\n  password: hostpw\n",
    );
    write(dir.path(), "groups.yaml", "lab:\n  username: labuser\n");
    write(dir.path(), "defaults.yaml", "username: admin\npassword: secret\n");

    let inventory: Inventory = Inventory::load(dir.path(), None).unwrap();
    let env = EnvCredentials {
        username: Some("ops".to_string()),
        password: Some(Password::new("envpw")),
    };

    let creds: Credentials = credentials::resolve(inventory.defaults(), &env, &mut NoPrompt).unwrap();
    assert_eq!(creds.username, "ops");
    let inventory: Inventory = inventory.with_credentials(&creds);

    let login = |name: &str| {
        let host = inventory.get(name).unwrap();
        (
            host.username.clone(),
            host.password.as_ref().map(|p| p.expose().to_string()),
        )
    };
    assert_eq!(login("r1"), (Some("ops".to_string()), Some("envpw".to_string())));
    assert_eq!(login("r2"), (Some("labuser".to_string()), Some("envpw".to_string())));
    assert_eq!(login("r3"), (Some("local".to_string()), Some("hostpw".to_string())));
    assert_eq!(inventory.defaults().username.as_deref(), Some("ops"));
}
