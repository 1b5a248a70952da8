//! Connectivity report printed at the end of a run.

use crate::models::{ConnectivityResult, ConnectivityStatus};
use crate::workflow::DemoReport;
use colored::Colorize;

/// Print both probe rounds as an aligned table on stdout.
///
/// Log lines carry the step-by-step narrative; this is the final summary.
pub fn print_report(report: &DemoReport) {
    println!();
    println!("{:<12} {:<28} {:<12} detail", "phase", "direction", "status");
    print_round("open", &report.initial);
    print_round("restricted", &report.restricted);
}

fn print_round(phase: &str, results: &[ConnectivityResult]) {
    for result in results {
        println!(
            "{phase:<12} {direction:<28} {status} {detail}",
            direction = direction(result),
            status = colorize(result.status),
            detail = detail(result),
        );
    }
}

fn direction(result: &ConnectivityResult) -> String {
    format!(
        "{} -> {}:{}",
        result.source_name(),
        result.dest_name(),
        result.port
    )
}

/// Pad first, then color: ANSI escapes would otherwise count against width.
fn colorize(status: ConnectivityStatus) -> colored::ColoredString {
    let padded = format!("{:<12}", status.to_string());
    match status {
        ConnectivityStatus::Reachable => padded.green(),
        ConnectivityStatus::Unreachable => padded.red(),
        ConnectivityStatus::Unknown => padded.yellow(),
    }
}

fn detail(result: &ConnectivityResult) -> String {
    let mut parts = Vec::new();
    if let Some(latency) = result.avg_latency_ms {
        parts.push(format!("avg {latency} ms"));
    }
    if let (Some(sent), Some(failed)) = (result.probes_sent, result.probes_failed) {
        parts.push(format!("{failed}/{sent} probes failed"));
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(status: ConnectivityStatus) -> ConnectivityResult {
        ConnectivityResult {
            source_vm_id: "/s/vm-probe-a".to_string(),
            dest_vm_id: "/s/vm-probe-b".to_string(),
            port: 22,
            status,
            avg_latency_ms: Some(3),
            probes_sent: Some(30),
            probes_failed: Some(30),
        }
    }

    #[test]
    fn test_direction_line() {
        let r = result(ConnectivityStatus::Reachable);
        assert_eq!(direction(&r), "vm-probe-a -> vm-probe-b:22");
    }

    #[test]
    fn test_detail_line() {
        let r = result(ConnectivityStatus::Unreachable);
        assert_eq!(detail(&r), "avg 3 ms, 30/30 probes failed");

        let bare = ConnectivityResult {
            avg_latency_ms: None,
            probes_sent: None,
            probes_failed: None,
            ..r
        };
        assert_eq!(detail(&bare), "");
    }
}
