//! Small text helpers shared by the report sections

use chrono::{DateTime, Duration, Utc};
use k8s_openapi::api::core::v1::{ReplicationController, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::cmp::Ordering;

/// Coarse, human readable form of a duration ("About an hour", "3 days")
pub fn human_duration(d: Duration) -> String {
    let seconds = d.num_seconds();
    if seconds < 1 {
        return "Less than a second".to_string();
    }
    if seconds == 1 {
        return "1 second".to_string();
    }
    if seconds < 60 {
        return format!("{} seconds", seconds);
    }
    let minutes = d.num_minutes();
    if minutes == 1 {
        return "About a minute".to_string();
    }
    if minutes < 46 {
        return format!("{} minutes", minutes);
    }
    let exact_hours = seconds as f64 / 3600.0;
    let hours = (exact_hours + 0.5) as i64;
    match hours {
        1 => "About an hour".to_string(),
        h if h < 48 => format!("{} hours", h),
        h if h < 24 * 7 * 2 => format!("{} days", h / 24),
        h if h < 24 * 30 * 2 => format!("{} weeks", h / 24 / 7),
        h if h < 24 * 365 * 2 => format!("{} months", h / 24 / 30),
        _ => format!("{} years", exact_hours as i64 / 24 / 365),
    }
}

/// Time since `t`, lower-cased for use mid-sentence; `<unknown>` when unset
pub fn relative_time(t: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match t {
        Some(t) => human_duration(now - t).to_lowercase(),
        None => "<unknown>".to_string(),
    }
}

/// Order exposed endpoints: https first, then http, then anything else;
/// within a scheme the shorter host wins, then plain string order
pub fn compare_exposed(a: &str, b: &str) -> Ordering {
    fn rank(s: &str) -> (u8, &str) {
        if let Some(rest) = s.strip_prefix("https://") {
            (0, rest)
        } else if let Some(rest) = s.strip_prefix("http://") {
            (1, rest)
        } else {
            (2, s)
        }
    }
    let (rank_a, rest_a) = rank(a);
    let (rank_b, rest_b) = rank(b);
    if rank_a != rank_b || rank_a == 2 {
        return rank_a.cmp(&rank_b).then_with(|| a.cmp(b));
    }
    let host_len = |s: &str| s.find(' ').unwrap_or(s.len());
    host_len(rest_a)
        .cmp(&host_len(rest_b))
        .then_with(|| rest_a.cmp(rest_b))
}

pub fn sort_exposed(exposed: &mut [String]) {
    exposed.sort_by(|a, b| compare_exposed(a, b));
}

fn int_or_string(value: Option<&IntOrString>) -> String {
    match value {
        Some(IntOrString::Int(n)) => n.to_string(),
        Some(IntOrString::String(s)) => s.clone(),
        None => "0".to_string(),
    }
}

fn is_node_port(spec: &ServiceSpec) -> bool {
    spec.type_.as_deref() == Some("NodePort")
}

fn is_headless(spec: &ServiceSpec) -> bool {
    spec.cluster_ip.as_deref() == Some("None")
}

/// The port clients use: the service port, or the node port for node-port services
pub fn port_or_node_port(spec: &ServiceSpec, port: &ServicePort) -> String {
    if !is_node_port(spec) {
        return port.port.to_string();
    }
    match port.node_port {
        Some(n) if n != 0 => n.to_string(),
        _ => "<initializing>".to_string(),
    }
}

/// Port suffix of a service line: ` no ports`, `:80 -> 8080`, ` ports 80, 443->8443`
pub fn describe_service_ports(spec: &ServiceSpec) -> String {
    let ports = spec.ports.as_deref().unwrap_or_default();
    match ports {
        [] => " no ports".to_string(),
        [port] => {
            let external = port_or_node_port(spec, port);
            let target = int_or_string(port.target_port.as_ref());
            if target == "0" || is_headless(spec) || external == target {
                format!(":{}", external)
            } else {
                format!(":{} -> {}", external, target)
            }
        }
        ports => {
            let pairs: Vec<String> = ports
                .iter()
                .map(|port| {
                    let external = port_or_node_port(spec, port);
                    let target = int_or_string(port.target_port.as_ref());
                    if target == "0" || is_headless(spec) {
                        external
                    } else if matches!(port.target_port, Some(IntOrString::Int(t)) if t == port.port) {
                        target
                    } else {
                        format!("{}->{}", external, target)
                    }
                })
                .collect();
            format!(" ports {}", pairs.join(", "))
        }
    }
}

fn replica_counts(rc: &ReplicationController) -> (i32, i32) {
    let actual = rc.status.as_ref().map(|s| s.replicas).unwrap_or(0);
    let requested = rc.spec.as_ref().and_then(|s| s.replicas).unwrap_or(1);
    (actual, requested)
}

/// `1 pod`, `3 pods`, `1/3 pods`; empty for zero unless `include_empty`
pub fn describe_pod_summary(rc: &ReplicationController, include_empty: bool) -> String {
    let (actual, requested) = replica_counts(rc);
    if actual != requested {
        return format!("{}/{} pods", actual, requested);
    }
    match actual {
        0 if include_empty => "0 pods".to_string(),
        0 => String::new(),
        1 => "1 pod".to_string(),
        n => format!("{} pods", n),
    }
}

/// Pod summary as a ` - ...` suffix, noting a pending scale change
pub fn describe_pod_summary_inline(rc: &ReplicationController, include_empty: bool) -> String {
    let summary = describe_pod_summary(rc, include_empty);
    if summary.is_empty() {
        return summary;
    }
    let (actual, desired) = replica_counts(rc);
    let change = match desired.cmp(&actual) {
        Ordering::Less => format!(" reducing to {}", desired),
        Ordering::Greater => format!(" growing to {}", desired),
        Ordering::Equal => String::new(),
    };
    format!(" - {}{}", summary, change)
}

/// Append `lines` to `out`: the first at `depth` indents, the rest one deeper
pub fn print_lines(out: &mut Vec<String>, indent: &str, depth: usize, lines: Vec<String>) {
    for (i, line) in lines.into_iter().enumerate() {
        let mut prefix = indent.repeat(depth);
        if i != 0 {
            prefix.push_str(indent);
        }
        out.push(format!("{}{}", prefix, line));
    }
}

pub fn indent_lines(indent: &str, lines: Vec<String>) -> Vec<String> {
    lines
        .into_iter()
        .map(|line| format!("{}{}", indent, line))
        .collect()
}
