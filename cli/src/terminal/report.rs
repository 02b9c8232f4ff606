//! # Result Reporter
//!
//! Turns run results into display lines. Nothing here prints or touches the
//! results; [`print::render`](crate::terminal::print::render) does the output.
//! Both tasks share the same layout: a kickoff block, one bannered section
//! per host and a closing block that always lists the failed hosts.

use netrun_common::result::{LatencyStats, RunReport, TaskOutput, TaskResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportLine {
    /// Full-width separator.
    Rule,
    Banner(String),
    Success(String),
    Failure(String),
    /// Key/value shown as a tree under the previous banner.
    Detail { key: String, value: String },
}

fn detail(key: &str, value: impl Into<String>) -> ReportLine {
    ReportLine::Detail {
        key: key.to_string(),
        value: value.into(),
    }
}

/// The opening block. The closing rule is left to the caller so credential
/// prompts can appear inside the block.
pub fn kickoff(
    description: &str,
    timestamp: &str,
    destination: Option<&str>,
    devices: &[&str],
) -> Vec<ReportLine> {
    let mut lines: Vec<ReportLine> = vec![
        ReportLine::Rule,
        ReportLine::Banner(description.to_string()),
        ReportLine::Banner(format!("Timestamp: {timestamp}")),
    ];

    if let Some(destination) = destination {
        lines.push(ReportLine::Banner(format!("Destination: {destination}")));
    }

    lines.push(ReportLine::Banner(format!("Devices: {}", devices.join(", "))));
    lines
}

pub fn host_section(name: &str, result: &TaskResult) -> Vec<ReportLine> {
    let mut lines: Vec<ReportLine> = vec![ReportLine::Banner(format!(
        "**** {name}: BEGIN TESTING ****"
    ))];

    match result {
        Ok(TaskOutput::Networks(networks)) => {
            lines.push(ReportLine::Success(format!(
                "*** {name}: {} networks ***",
                networks.len()
            )));
        }
        Ok(TaskOutput::Latency(stats)) => {
            lines.push(ReportLine::Success(format!("*** {name}: ping complete ***")));
            lines.extend(latency_details(stats));
        }
        Err(e) => {
            lines.push(ReportLine::Failure(format!("*** {name}: FAILED: {e} ***")));
        }
    }

    lines
}

fn latency_details(stats: &LatencyStats) -> Vec<ReportLine> {
    vec![
        detail("Sent", stats.probes_sent.to_string()),
        detail("Lost", stats.packet_loss.to_string()),
        detail("Loss", format!("{:.2}%", stats.loss_percent())),
        detail("RTT avg", format!("{} ms", stats.rtt_avg)),
    ]
}

pub fn summary(report: &RunReport) -> Vec<ReportLine> {
    let failed: Vec<&str> = report.failed_hosts();
    let verdict: String = format!("Failed hosts: [{}]", failed.join(", "));

    vec![
        ReportLine::Rule,
        if failed.is_empty() {
            ReportLine::Success(verdict)
        } else {
            ReportLine::Failure(verdict)
        },
        ReportLine::Banner(format!(
            "{}: {} hosts completed in {:.2}s",
            report.task,
            report.len(),
            report.elapsed.as_secs_f64()
        )),
        ReportLine::Rule,
    ]
}

/// Process exit status for a finished run: 1 when any host failed.
pub fn exit_status(report: &RunReport) -> u8 {
    if report.has_failures() { 1 } else { 0 }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use netrun_common::error::DeviceError;
    use netrun_common::result::TaskError;
    use std::collections::{BTreeMap, BTreeSet};
    use std::time::Duration;

    fn report(results: Vec<(&str, TaskResult)>) -> RunReport {
        RunReport {
            task: "latency".to_string(),
            results: results
                .into_iter()
                .map(|(name, result)| (name.to_string(), result))
                .collect::<BTreeMap<_, _>>(),
            elapsed: Duration::from_millis(1500),
        }
    }

    #[test]
    fn kickoff_should_list_devices_and_destination() {
        let lines: Vec<ReportLine> = kickoff("Latency check", "2024-01-01 10:00:00", Some("2.2.2.2"), &[
            "r1", "r2",
        ]);
        assert_eq!(lines[0], ReportLine::Rule);
        assert!(lines.contains(&ReportLine::Banner("Destination: 2.2.2.2".to_string())));
        assert_eq!(
            lines.last(),
            Some(&ReportLine::Banner("Devices: r1, r2".to_string()))
        );
    }

    #[test]
    fn host_section_should_count_networks() {
        let result: TaskResult = Ok(TaskOutput::Networks(BTreeSet::from([
            "10.0.0.0/8".to_string(),
            "20.0.0.0/8".to_string(),
        ])));
        let lines: Vec<ReportLine> = host_section("r1", &result);
        assert_eq!(lines, vec![
            ReportLine::Banner("**** r1: BEGIN TESTING ****".to_string()),
            ReportLine::Success("*** r1: 2 networks ***".to_string()),
        ]);
    }

    #[test]
    fn host_section_should_show_loss_as_percentage() {
        let result: TaskResult = Ok(TaskOutput::Latency(LatencyStats::new(100, 5, 12.3)));
        let lines: Vec<ReportLine> = host_section("r1", &result);
        assert!(lines.contains(&detail("Loss", "5.00%")));
        assert!(lines.contains(&detail("RTT avg", "12.3 ms")));
    }

    #[test]
    fn host_section_should_render_failure() {
        let result: TaskResult = Err(TaskError::Device(DeviceError::Timeout(
            "connecting to 10.0.0.1:22".to_string(),
        )));
        let lines: Vec<ReportLine> = host_section("r9", &result);
        assert_eq!(lines, vec![
            ReportLine::Banner("**** r9: BEGIN TESTING ****".to_string()),
            ReportLine::Failure("*** r9: FAILED: timed out: connecting to 10.0.0.1:22 ***".to_string()),
        ]);
    }

    #[test]
    fn summary_should_always_list_failed_hosts() {
        let clean: RunReport = report(vec![(
            "r1",
            Ok(TaskOutput::Networks(BTreeSet::new())),
        )]);
        assert!(summary(&clean).contains(&ReportLine::Success("Failed hosts: []".to_string())));
        assert!(summary(&clean).contains(&ReportLine::Banner(
            "latency: 1 hosts completed in 1.50s".to_string()
        )));
        assert_eq!(exit_status(&clean), 0);

        let failed: RunReport = report(vec![
            ("r1", Ok(TaskOutput::Networks(BTreeSet::new()))),
            ("r2", Err(TaskError::Parse("no rows".to_string()))),
            ("r3", Err(TaskError::MissingVariable("dest".to_string()))),
        ]);
        assert!(
            summary(&failed).contains(&ReportLine::Failure("Failed hosts: [r2, r3]".to_string()))
        );
        assert_eq!(exit_status(&failed), 1);
    }
}
