//! The demo workflow: provision, peer, probe, narrow, re-probe, tear down.
//!
//! Strictly sequential; each step awaits the provider's long-running operation
//! before the next one depends on it. Any step failure unwinds straight to
//! teardown, which always runs and never raises.

mod peering;
mod probe;
mod provision;
mod teardown;

pub use provision::{DemoMachines, DemoNetworks};
pub use teardown::TeardownTarget;

use crate::config::DemoPlan;
use crate::models::ConnectivityResult;
use crate::provider::Provider;
use std::error::Error;

/// Connectivity verdicts from both probe rounds, in probe order (A->B, B->A).
#[derive(Debug, Clone)]
pub struct DemoReport {
    /// Verdicts while the peering allowed network access.
    pub initial: Vec<ConnectivityResult>,
    /// Verdicts after access was revoked.
    pub restricted: Vec<ConnectivityResult>,
}

/// Run the whole demo against one provider.
///
/// Teardown is unconditional: it consumes whatever provisioning produced and
/// runs before the provisioning outcome is returned.
pub async fn run_demo(
    provider: &dyn Provider,
    plan: &DemoPlan,
) -> Result<DemoReport, Box<dyn Error + Send + Sync>> {
    let (target, outcome) = provision_and_probe(provider, plan).await;
    teardown::delete_group(provider, target).await;
    outcome
}

/// Provision everything and run both probe rounds.
///
/// Returns the teardown target separately from the outcome so a failure after
/// group creation still hands the group to teardown.
async fn provision_and_probe(
    provider: &dyn Provider,
    plan: &DemoPlan,
) -> (
    TeardownTarget,
    Result<DemoReport, Box<dyn Error + Send + Sync>>,
) {
    // Invalid plans never reach the provider.
    if let Err(e) = plan.validate() {
        return (TeardownTarget::Nothing, Err(e));
    }

    let group = match provider
        .create_resource_group(&plan.group_name, &plan.region)
        .await
    {
        Ok(group) => group,
        Err(e) => return (TeardownTarget::Nothing, Err(e)),
    };
    log::info!(
        "Created resource group '{}' in {}",
        group.name,
        plan.region
    );

    let target = TeardownTarget::Group(group.name);
    let outcome = drive(provider, plan).await;
    (target, outcome)
}

/// Networks, machines, peering, and the probe rounds around the narrow.
async fn drive(
    provider: &dyn Provider,
    plan: &DemoPlan,
) -> Result<DemoReport, Box<dyn Error + Send + Sync>> {
    let networks = provision::create_networks(provider, plan).await?;
    let machines = provision::create_machines(provider, plan, &networks).await?;

    peering::establish(provider, plan, &networks).await?;

    let watcher = probe::ensure_watcher(provider, plan).await?;
    let initial = probe::probe_both_directions(provider, &watcher, plan, &machines).await?;

    peering::narrow(provider, plan, &networks).await?;
    let restricted = probe::probe_both_directions(provider, &watcher, plan, &machines).await?;

    Ok(DemoReport {
        initial,
        restricted,
    })
}
