//! Connectivity probing through the regional diagnostics watcher.

use super::provision::DemoMachines;
use crate::config::DemoPlan;
use crate::models::{ConnectivityResult, ProbeRequest};
use crate::provider::{NetworkWatcher, Provider};
use std::error::Error;

/// Look up the region's watcher once, before the first probe is issued.
pub async fn ensure_watcher(
    provider: &dyn Provider,
    plan: &DemoPlan,
) -> Result<NetworkWatcher, Box<dyn Error + Send + Sync>> {
    provider
        .ensure_network_watcher(&plan.group_name, &plan.region)
        .await
}

/// Probe A->B then B->A on the plan's port.
///
/// Every call issues fresh checks; verdicts are never reused from an earlier
/// round, so a probe after a peering update reflects the updated state.
pub async fn probe_both_directions(
    provider: &dyn Provider,
    watcher: &NetworkWatcher,
    plan: &DemoPlan,
    machines: &DemoMachines,
) -> Result<Vec<ConnectivityResult>, Box<dyn Error + Send + Sync>> {
    let mut results = Vec::with_capacity(2);
    for (source, dest) in [(&machines.a, &machines.b), (&machines.b, &machines.a)] {
        let request = ProbeRequest {
            source_vm_id: source.id.clone(),
            dest_vm_id: dest.id.clone(),
            port: plan.probe_port,
        };
        let result = provider.check_connectivity(watcher, &request).await?;
        log::info!(
            "Connectivity {} -> {} on port {}: {}",
            source.name,
            dest.name,
            result.port,
            result.status
        );
        results.push(result);
    }
    Ok(results)
}
