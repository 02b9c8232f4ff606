//! Cisco IOS command builders and output parsers.
//!
//! The parsers produce the same shapes the rest of the crate expects from any
//! executor: TextFSM-like row objects for `show ip bgp` and a NAPALM-like
//! `{"success": ...}` / `{"error": ...}` object for ping.

use std::sync::OnceLock;

use netrun_common::executor::PingRequest;
use regex::Regex;
use serde_json::{Map, Value, json};

/// Characters IOS uses in the status column of the BGP table.
const BGP_STATUS_CHARS: &str = "*>=sdhirSmbfxacR";

static IPV4_PREFIX: OnceLock<Regex> = OnceLock::new();
static PING_SUCCESS: OnceLock<Regex> = OnceLock::new();
static PING_RTT: OnceLock<Regex> = OnceLock::new();

fn ipv4_prefix() -> &'static Regex {
    IPV4_PREFIX.get_or_init(|| {
        Regex::new(r"^\d{1,3}(\.\d{1,3}){3}(/\d{1,2})?$").expect("valid IPv4 prefix regex")
    })
}

fn ping_success() -> &'static Regex {
    PING_SUCCESS.get_or_init(|| {
        Regex::new(r"Success rate is (\d+) percent \((\d+)/(\d+)\)").expect("valid ping regex")
    })
}

fn ping_rtt() -> &'static Regex {
    PING_RTT.get_or_init(|| {
        Regex::new(r"round-trip min/avg/max = (\d+)/(\d+)/(\d+) ms").expect("valid rtt regex")
    })
}

/// `true` for `show ip bgp ...` in any IOS abbreviation (`sh ip bgp`).
pub fn is_show_ip_bgp(command: &str) -> bool {
    let mut words = command.split_whitespace();
    matches!(
        (words.next(), words.next(), words.next()),
        (Some(show), Some("ip"), Some("bgp")) if show.len() >= 2 && "show".starts_with(show)
    )
}

pub fn ping_command(request: &PingRequest) -> String {
    let mut command: String = match &request.vrf {
        Some(vrf) => format!("ping vrf {vrf} {}", request.destination),
        None => format!("ping {}", request.destination),
    };
    command.push_str(&format!(
        " timeout {} size {} repeat {}",
        request.timeout, request.size, request.count
    ));
    if let Some(source) = &request.source {
        command.push_str(&format!(" source {source}"));
    }
    command
}

/// Turns the `show ip bgp` table into rows of `status`, `network`,
/// `next_hop` and `path`.
///
/// The AS path is cut at the column of the `Path` header. Extra paths for a prefix are printed without the network column; those
/// rows inherit the previous network. Long prefixes push the next hop onto
/// the following line.
pub fn parse_show_ip_bgp(output: &str) -> Value {
    let mut rows: Vec<Value> = Vec::new();
    let mut path_column: Option<usize> = None;
    let mut last_network: Option<String> = None;
    let mut wrapped: Option<(String, String)> = None;

    for line in output.lines() {
        let Some(column) = path_column else {
            if line.contains("Network") && line.contains("Next Hop") {
                path_column = Some(line.find("Path").unwrap_or(line.len()));
            }
            continue;
        };
        let path: &str = line.get(column..).map(str::trim).unwrap_or("");

        let (status, rest) = split_status(line);
        let ip_count: usize = rest.iter().take_while(|t| ipv4_prefix().is_match(t)).count();

        match (ip_count, rest.len()) {
            (0, _) => {}
            (1, 1) => wrapped = Some((status, rest[0].to_string())),
            (1, _) => {
                let (status, network) = match wrapped.take() {
                    Some(entry) => entry,
                    None => match &last_network {
                        Some(network) => (status, network.clone()),
                        None => continue,
                    },
                };
                rows.push(bgp_row(&status, &network, rest[0], path));
                last_network = Some(network);
            }
            _ => {
                rows.push(bgp_row(&status, rest[0], rest[1], path));
                last_network = Some(rest[0].to_string());
            }
        }
    }

    Value::Array(rows)
}

/// Splits the leading status codes off a table line. Handles IOS gluing the
/// codes to the network (`*>i10.1.1.0/24`).
fn split_status(line: &str) -> (String, Vec<&str>) {
    let mut status = String::new();
    let mut rest: Vec<&str> = Vec::new();

    for token in line.split_whitespace() {
        if !rest.is_empty() {
            rest.push(token);
            continue;
        }

        let split: usize = token
            .find(|c: char| !BGP_STATUS_CHARS.contains(c))
            .unwrap_or(token.len());
        status.push_str(&token[..split]);
        if split < token.len() {
            rest.push(&token[split..]);
        }
    }

    (status, rest)
}

fn bgp_row(status: &str, network: &str, next_hop: &str, path: &str) -> Value {
    json!({
        "status": status,
        "network": network,
        "next_hop": next_hop,
        "path": path,
    })
}

/// Converts IOS ping output into a NAPALM-style result.
pub fn parse_ping(output: &str) -> Value {
    let Some(caps) = ping_success().captures(output) else {
        let reason: &str = output
            .lines()
            .map(str::trim)
            .find(|l| l.starts_with('%'))
            .unwrap_or("no ping statistics in device output");
        return json!({ "error": reason });
    };

    let received: u64 = caps[2].parse().unwrap_or(0);
    let sent: u64 = caps[3].parse().unwrap_or(0);

    let (rtt_min, rtt_avg, rtt_max): (f64, f64, f64) = match ping_rtt().captures(output) {
        Some(rtt) => (
            rtt[1].parse().unwrap_or(0.0),
            rtt[2].parse().unwrap_or(0.0),
            rtt[3].parse().unwrap_or(0.0),
        ),
        None => (0.0, 0.0, 0.0),
    };

    let mut success: Map<String, Value> = Map::new();
    success.insert("probes_sent".into(), json!(sent));
    success.insert("packet_loss".into(), json!(sent.saturating_sub(received)));
    success.insert("rtt_min".into(), json!(rtt_min));
    success.insert("rtt_avg".into(), json!(rtt_avg));
    success.insert("rtt_max".into(), json!(rtt_max));
    success.insert("rtt_stddev".into(), json!(0.0));

    json!({ "success": success })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
