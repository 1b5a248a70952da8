//! The management-plane seam the workflow drives.
//!
//! Every operation wraps one provider call and blocks until the provider's
//! long-running operation completes, so callers sequence on ordinary `await`.
//! The live implementation is [`crate::azure::ArmProvider`]; tests drive the
//! workflow with an in-memory fake.

use crate::models::{
    ConnectivityResult, NetworkInterface, NetworkInterfaceSpec, PeeringSpec, PeeringState,
    ProbeRequest, VirtualMachine, VirtualMachineSpec, VirtualNetwork, VirtualNetworkSpec,
    VmExtensionSpec,
};
use async_trait::async_trait;
use std::error::Error;

/// A provisioned resource group.
#[derive(Debug, Clone)]
pub struct ResourceGroup {
    pub id: String,
    pub name: String,
}

/// The regional diagnostics watcher backing connectivity checks.
#[derive(Debug, Clone)]
pub struct NetworkWatcher {
    pub id: String,
    pub name: String,
    /// Resource group the watcher lives in.
    pub group_name: String,
}

/// Management operations the workflow needs from the cloud provider.
///
/// No retries anywhere; a failed operation is returned as-is and ends the run.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Create-or-update a resource group and wait until it is provisioned.
    async fn create_resource_group(
        &self,
        name: &str,
        region: &str,
    ) -> Result<ResourceGroup, Box<dyn Error + Send + Sync>>;

    /// Create a virtual network with its single subnet.
    async fn create_virtual_network(
        &self,
        group: &str,
        region: &str,
        spec: &VirtualNetworkSpec,
    ) -> Result<VirtualNetwork, Box<dyn Error + Send + Sync>>;

    /// Create a network interface bound to one subnet.
    async fn create_network_interface(
        &self,
        group: &str,
        region: &str,
        spec: &NetworkInterfaceSpec,
    ) -> Result<NetworkInterface, Box<dyn Error + Send + Sync>>;

    /// Create a virtual machine attached to an existing interface.
    async fn create_virtual_machine(
        &self,
        group: &str,
        region: &str,
        spec: &VirtualMachineSpec,
        nic_id: &str,
    ) -> Result<VirtualMachine, Box<dyn Error + Send + Sync>>;

    /// Install an extension on an existing virtual machine.
    async fn install_vm_extension(
        &self,
        group: &str,
        region: &str,
        vm_name: &str,
        spec: &VmExtensionSpec,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Create one directional peering record on `network`.
    async fn create_peering(
        &self,
        group: &str,
        network: &str,
        spec: &PeeringSpec,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Fetch an existing peering record for a later in-place update.
    async fn get_peering(
        &self,
        group: &str,
        network: &str,
        name: &str,
    ) -> Result<PeeringState, Box<dyn Error + Send + Sync>>;

    /// Commit an updated peering record and wait until it is applied.
    async fn update_peering(
        &self,
        group: &str,
        network: &str,
        state: &PeeringState,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Look up the region's diagnostics watcher, creating one only when the
    /// region has none.
    async fn ensure_network_watcher(
        &self,
        group: &str,
        region: &str,
    ) -> Result<NetworkWatcher, Box<dyn Error + Send + Sync>>;

    /// Run one reachability test and wait for its verdict.
    async fn check_connectivity(
        &self,
        watcher: &NetworkWatcher,
        probe: &ProbeRequest,
    ) -> Result<ConnectivityResult, Box<dyn Error + Send + Sync>>;

    /// Delete a resource group and everything in it.
    async fn delete_resource_group(
        &self,
        name: &str,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;
}
