//! Resource provisioning: the two networks and the two machines.

use crate::config::DemoPlan;
use crate::models::{
    NetworkInterfaceSpec, VirtualMachine, VirtualMachineSpec, VirtualNetwork, VmExtensionSpec,
};
use crate::provider::Provider;
use std::error::Error;

/// The two provisioned networks, in plan order.
#[derive(Debug, Clone)]
pub struct DemoNetworks {
    pub a: VirtualNetwork,
    pub b: VirtualNetwork,
}

/// The two provisioned machines, in plan order.
#[derive(Debug, Clone)]
pub struct DemoMachines {
    pub a: VirtualMachine,
    pub b: VirtualMachine,
}

/// Create both isolated networks, one after the other.
pub async fn create_networks(
    provider: &dyn Provider,
    plan: &DemoPlan,
) -> Result<DemoNetworks, Box<dyn Error + Send + Sync>> {
    let a = create_network(provider, plan, 0).await?;
    let b = create_network(provider, plan, 1).await?;
    Ok(DemoNetworks { a, b })
}

async fn create_network(
    provider: &dyn Provider,
    plan: &DemoPlan,
    index: usize,
) -> Result<VirtualNetwork, Box<dyn Error + Send + Sync>> {
    let spec = &plan.networks[index];
    let network = provider
        .create_virtual_network(&plan.group_name, &plan.region, spec)
        .await?;
    log::info!(
        "Created virtual network '{}' ({})",
        network.name,
        spec.address_prefix
    );
    Ok(network)
}

/// Create both machines. The two chains are independent, so they run
/// concurrently; both must complete before peering starts.
pub async fn create_machines(
    provider: &dyn Provider,
    plan: &DemoPlan,
    networks: &DemoNetworks,
) -> Result<DemoMachines, Box<dyn Error + Send + Sync>> {
    let (a, b) = futures::try_join!(
        create_machine(provider, plan, &plan.machines[0], &networks.a),
        create_machine(provider, plan, &plan.machines[1], &networks.b),
    )?;
    Ok(DemoMachines { a, b })
}

/// One machine chain: interface, then the VM, then the diagnostics agent.
///
/// The agent extension is a precondition for connectivity checks; a machine
/// without it is not a valid probe endpoint.
async fn create_machine(
    provider: &dyn Provider,
    plan: &DemoPlan,
    spec: &VirtualMachineSpec,
    network: &VirtualNetwork,
) -> Result<VirtualMachine, Box<dyn Error + Send + Sync>> {
    let nic_spec = NetworkInterfaceSpec {
        name: spec.nic_name.clone(),
        subnet_id: network.subnet_id.clone(),
    };
    let nic = provider
        .create_network_interface(&plan.group_name, &plan.region, &nic_spec)
        .await?;
    log::debug!("Created network interface '{}'", nic.name);

    let vm = provider
        .create_virtual_machine(&plan.group_name, &plan.region, spec, &nic.id)
        .await?;

    provider
        .install_vm_extension(
            &plan.group_name,
            &plan.region,
            &vm.name,
            &VmExtensionSpec::network_watcher_agent(),
        )
        .await?;
    log::info!("Created virtual machine '{}' with diagnostics agent", vm.name);
    Ok(vm)
}
