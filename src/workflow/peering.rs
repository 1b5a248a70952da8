//! Peering lifecycle: establish both directions, later revoke access.

use super::provision::DemoNetworks;
use crate::config::DemoPlan;
use crate::models::PeeringSpec;
use crate::provider::Provider;
use std::error::Error;

/// Create the two directional records, each targeting the other network.
///
/// Both directions share one peering name and start permissive: network access
/// and forwarded traffic on, gateway transit off in both senses.
pub async fn establish(
    provider: &dyn Provider,
    plan: &DemoPlan,
    networks: &DemoNetworks,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let forward = PeeringSpec::permissive(&plan.peering_name, &networks.b.id);
    provider
        .create_peering(&plan.group_name, &networks.a.name, &forward)
        .await?;

    let reverse = PeeringSpec::permissive(&plan.peering_name, &networks.a.id);
    provider
        .create_peering(&plan.group_name, &networks.b.name, &reverse)
        .await?;

    log::info!(
        "Established peering '{}' between '{}' and '{}'",
        plan.peering_name,
        networks.a.name,
        networks.b.name
    );
    Ok(())
}

/// Revoke cross-network access on both existing records.
///
/// Fetch, flip the access flag, commit: an in-place update of the record, so
/// every other field keeps the value the provider already holds. Returns only
/// once both updates are committed; a probe after this call observes the
/// narrowed state.
pub async fn narrow(
    provider: &dyn Provider,
    plan: &DemoPlan,
    networks: &DemoNetworks,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    for network in [&networks.a, &networks.b] {
        let mut state = provider
            .get_peering(&plan.group_name, &network.name, &plan.peering_name)
            .await?;
        state.revoke_access();
        provider
            .update_peering(&plan.group_name, &network.name, &state)
            .await?;
    }
    log::info!(
        "Updated peering '{}': network access revoked",
        plan.peering_name
    );
    Ok(())
}
