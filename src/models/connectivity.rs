//! Connectivity check request and verdict types.

use std::fmt;

/// One reachability test: source machine, destination machine, destination port.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    /// Provider resource id of the source virtual machine.
    pub source_vm_id: String,
    /// Provider resource id of the destination virtual machine.
    pub dest_vm_id: String,
    /// Destination TCP port.
    pub port: u16,
}

/// Closed verdict set for a connectivity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityStatus {
    Reachable,
    Unreachable,
    Unknown,
}

impl ConnectivityStatus {
    /// Map the service's `connectionStatus` string onto the closed verdict set.
    ///
    /// Azure reports "Connected"/"Reachable" for a working path and
    /// "Disconnected"/"Degraded"/"Unreachable" for a broken one.
    pub fn from_connection_status(status: &str) -> ConnectivityStatus {
        match status {
            "Connected" | "Reachable" => ConnectivityStatus::Reachable,
            "Disconnected" | "Degraded" | "Unreachable" => ConnectivityStatus::Unreachable,
            _ => ConnectivityStatus::Unknown,
        }
    }
}

impl fmt::Display for ConnectivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectivityStatus::Reachable => "Reachable",
            ConnectivityStatus::Unreachable => "Unreachable",
            ConnectivityStatus::Unknown => "Unknown",
        };
        write!(f, "{s}")
    }
}

/// Immutable snapshot of one probe invocation.
#[derive(Debug, Clone)]
pub struct ConnectivityResult {
    pub source_vm_id: String,
    pub dest_vm_id: String,
    pub port: u16,
    pub status: ConnectivityStatus,
    /// Average round-trip latency, when the service reports it.
    pub avg_latency_ms: Option<u32>,
    /// Probes sent / failed, when the service reports them.
    pub probes_sent: Option<u32>,
    pub probes_failed: Option<u32>,
}

impl ConnectivityResult {
    /// Short name of the source machine, for log and report lines.
    pub fn source_name(&self) -> &str {
        last_segment(&self.source_vm_id)
    }

    /// Short name of the destination machine.
    pub fn dest_name(&self) -> &str {
        last_segment(&self.dest_vm_id)
    }
}

fn last_segment(resource_id: &str) -> &str {
    resource_id.rsplit('/').next().unwrap_or(resource_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_status_mapping() {
        assert_eq!(
            ConnectivityStatus::from_connection_status("Connected"),
            ConnectivityStatus::Reachable
        );
        assert_eq!(
            ConnectivityStatus::from_connection_status("Reachable"),
            ConnectivityStatus::Reachable
        );
        assert_eq!(
            ConnectivityStatus::from_connection_status("Disconnected"),
            ConnectivityStatus::Unreachable
        );
        assert_eq!(
            ConnectivityStatus::from_connection_status("Degraded"),
            ConnectivityStatus::Unreachable
        );
        assert_eq!(
            ConnectivityStatus::from_connection_status("SomethingNew"),
            ConnectivityStatus::Unknown
        );
    }

    #[test]
    fn test_short_names_from_resource_ids() {
        let result = ConnectivityResult {
            source_vm_id: "/subscriptions/s/resourceGroups/g/providers/Microsoft.Compute/virtualMachines/vm-probe-a".to_string(),
            dest_vm_id: "/subscriptions/s/resourceGroups/g/providers/Microsoft.Compute/virtualMachines/vm-probe-b".to_string(),
            port: 22,
            status: ConnectivityStatus::Reachable,
            avg_latency_ms: Some(2),
            probes_sent: Some(30),
            probes_failed: Some(0),
        };
        assert_eq!(result.source_name(), "vm-probe-a");
        assert_eq!(result.dest_name(), "vm-probe-b");
    }
}
