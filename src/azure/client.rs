//! `Provider` implementation against Azure Resource Manager.
//!
//! Owns the resource paths, API versions and request/response shapes for every
//! management operation the workflow issues.

use super::arm::{parse_typed, ArmClient};
use super::auth::build_credential;
use crate::config::Settings;
use crate::models::{
    ConnectivityResult, ConnectivityStatus, NetworkInterface, NetworkInterfaceSpec, PeeringSpec,
    PeeringState, ProbeRequest, VirtualMachine, VirtualMachineSpec, VirtualNetwork,
    VirtualNetworkSpec, VmExtensionSpec,
};
use crate::provider::{NetworkWatcher, Provider, ResourceGroup};
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use std::error::Error;

const RESOURCE_API_VERSION: &str = "2021-04-01";
const NETWORK_API_VERSION: &str = "2023-09-01";
const COMPUTE_API_VERSION: &str = "2023-09-01";

/// Live Azure implementation of the [`Provider`] seam.
pub struct ArmProvider {
    arm: ArmClient,
    subscription_id: String,
}

/// Minimal shape shared by most resource bodies.
#[derive(Deserialize, Debug)]
struct ResourceBody {
    id: String,
    name: String,
}

#[derive(Deserialize, Debug)]
struct VnetBody {
    id: String,
    name: String,
    properties: VnetProperties,
}

#[derive(Deserialize, Debug)]
struct VnetProperties {
    subnets: Vec<ResourceBody>,
}

#[derive(Deserialize, Debug)]
struct WatcherList {
    value: Vec<WatcherBody>,
}

#[derive(Deserialize, Debug)]
struct WatcherBody {
    id: String,
    name: String,
    location: String,
}

/// Verdict payload of a connectivity check.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ConnectivityInformation {
    connection_status: String,
    #[serde(default)]
    avg_latency_in_ms: Option<u32>,
    #[serde(default)]
    probes_sent: Option<u32>,
    #[serde(default)]
    probes_failed: Option<u32>,
}

impl ArmProvider {
    /// Build the provider from validated settings.
    pub fn new(settings: &Settings) -> ArmProvider {
        ArmProvider {
            arm: ArmClient::new(build_credential()),
            subscription_id: settings.subscription_id.clone(),
        }
    }

    fn group_path(&self, name: &str) -> String {
        format!(
            "/subscriptions/{}/resourcegroups/{}",
            self.subscription_id, name
        )
    }

    fn network_path(&self, group: &str, tail: &str) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/{}",
            self.subscription_id, group, tail
        )
    }

    fn compute_path(&self, group: &str, tail: &str) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Compute/{}",
            self.subscription_id, group, tail
        )
    }
}

#[async_trait]
impl Provider for ArmProvider {
    async fn create_resource_group(
        &self,
        name: &str,
        region: &str,
    ) -> Result<ResourceGroup, Box<dyn Error + Send + Sync>> {
        let body = self
            .arm
            .send(
                Method::PUT,
                &self.group_path(name),
                RESOURCE_API_VERSION,
                Some(json!({ "location": region })),
            )
            .await?;
        let parsed: ResourceBody = parse_typed(body)?;
        Ok(ResourceGroup {
            id: parsed.id,
            name: parsed.name,
        })
    }

    async fn create_virtual_network(
        &self,
        group: &str,
        region: &str,
        spec: &VirtualNetworkSpec,
    ) -> Result<VirtualNetwork, Box<dyn Error + Send + Sync>> {
        let path = self.network_path(group, &format!("virtualNetworks/{}", spec.name));
        let body = json!({
            "location": region,
            "properties": {
                "addressSpace": {
                    "addressPrefixes": [spec.address_prefix.to_string()]
                },
                "subnets": [{
                    "name": spec.subnet_name,
                    "properties": { "addressPrefix": spec.subnet_prefix.to_string() }
                }]
            }
        });
        let body = self
            .arm
            .send(Method::PUT, &path, NETWORK_API_VERSION, Some(body))
            .await?;
        let parsed: VnetBody = parse_typed(body)?;

        let subnet = parsed
            .properties
            .subnets
            .iter()
            .find(|s| s.name == spec.subnet_name)
            .ok_or_else(|| {
                format!(
                    "Network '{}' came back without subnet '{}'",
                    parsed.name, spec.subnet_name
                )
            })?;

        Ok(VirtualNetwork {
            id: parsed.id,
            name: parsed.name.clone(),
            subnet_id: subnet.id.clone(),
        })
    }

    async fn create_network_interface(
        &self,
        group: &str,
        region: &str,
        spec: &NetworkInterfaceSpec,
    ) -> Result<NetworkInterface, Box<dyn Error + Send + Sync>> {
        let path = self.network_path(group, &format!("networkInterfaces/{}", spec.name));
        let body = json!({
            "location": region,
            "properties": {
                "ipConfigurations": [{
                    "name": "ipconfig1",
                    "properties": {
                        "subnet": { "id": spec.subnet_id },
                        "privateIPAllocationMethod": "Dynamic"
                    }
                }]
            }
        });
        let body = self
            .arm
            .send(Method::PUT, &path, NETWORK_API_VERSION, Some(body))
            .await?;
        let parsed: ResourceBody = parse_typed(body)?;
        Ok(NetworkInterface {
            id: parsed.id,
            name: parsed.name,
        })
    }

    async fn create_virtual_machine(
        &self,
        group: &str,
        region: &str,
        spec: &VirtualMachineSpec,
        nic_id: &str,
    ) -> Result<VirtualMachine, Box<dyn Error + Send + Sync>> {
        let path = self.compute_path(group, &format!("virtualMachines/{}", spec.name));
        let body = json!({
            "location": region,
            "properties": {
                "hardwareProfile": { "vmSize": spec.size },
                "storageProfile": {
                    "imageReference": {
                        "publisher": spec.image.publisher,
                        "offer": spec.image.offer,
                        "sku": spec.image.sku,
                        "version": spec.image.version
                    },
                    "osDisk": {
                        "createOption": "FromImage",
                        "managedDisk": { "storageAccountType": "Standard_LRS" }
                    }
                },
                "osProfile": {
                    "computerName": spec.name,
                    "adminUsername": spec.admin.username,
                    "adminPassword": spec.admin.password
                },
                "networkProfile": {
                    "networkInterfaces": [{ "id": nic_id }]
                }
            }
        });
        let body = self
            .arm
            .send(Method::PUT, &path, COMPUTE_API_VERSION, Some(body))
            .await?;
        let parsed: ResourceBody = parse_typed(body)?;
        Ok(VirtualMachine {
            id: parsed.id,
            name: parsed.name,
        })
    }

    async fn install_vm_extension(
        &self,
        group: &str,
        region: &str,
        vm_name: &str,
        spec: &VmExtensionSpec,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let path = self.compute_path(
            group,
            &format!("virtualMachines/{}/extensions/{}", vm_name, spec.name),
        );
        let body = json!({
            "location": region,
            "properties": {
                "publisher": spec.publisher,
                "type": spec.type_name,
                "typeHandlerVersion": spec.type_handler_version,
                "autoUpgradeMinorVersion": true
            }
        });
        self.arm
            .send(Method::PUT, &path, COMPUTE_API_VERSION, Some(body))
            .await?;
        Ok(())
    }

    async fn create_peering(
        &self,
        group: &str,
        network: &str,
        spec: &PeeringSpec,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let path = self.network_path(
            group,
            &format!("virtualNetworks/{}/virtualNetworkPeerings/{}", network, spec.name),
        );
        let body = json!({
            "properties": {
                "remoteVirtualNetwork": { "id": spec.remote_network_id },
                "allowVirtualNetworkAccess": spec.allow_virtual_network_access,
                "allowForwardedTraffic": spec.allow_forwarded_traffic,
                "allowGatewayTransit": spec.allow_gateway_transit,
                "useRemoteGateways": spec.use_remote_gateways
            }
        });
        self.arm
            .send(Method::PUT, &path, NETWORK_API_VERSION, Some(body))
            .await?;
        Ok(())
    }

    async fn get_peering(
        &self,
        group: &str,
        network: &str,
        name: &str,
    ) -> Result<PeeringState, Box<dyn Error + Send + Sync>> {
        let path = self.network_path(
            group,
            &format!("virtualNetworks/{}/virtualNetworkPeerings/{}", network, name),
        );
        let body = self.arm.get(&path, NETWORK_API_VERSION).await?;
        parse_typed(body)
    }

    async fn update_peering(
        &self,
        group: &str,
        network: &str,
        state: &PeeringState,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let path = self.network_path(
            group,
            &format!(
                "virtualNetworks/{}/virtualNetworkPeerings/{}",
                network, state.name
            ),
        );
        let body = json!({ "properties": state.properties });
        self.arm
            .send(Method::PUT, &path, NETWORK_API_VERSION, Some(body))
            .await?;
        Ok(())
    }

    async fn ensure_network_watcher(
        &self,
        group: &str,
        region: &str,
    ) -> Result<NetworkWatcher, Box<dyn Error + Send + Sync>> {
        // One watcher per region per subscription; reuse before creating.
        let list_path = format!(
            "/subscriptions/{}/providers/Microsoft.Network/networkWatchers",
            self.subscription_id
        );
        let body = self.arm.get(&list_path, NETWORK_API_VERSION).await?;
        let list: WatcherList = parse_typed(body)?;

        if let Some(existing) = list
            .value
            .iter()
            .find(|w| w.location.eq_ignore_ascii_case(region))
        {
            log::info!(
                "Using existing network watcher '{}' in {}",
                existing.name,
                existing.location
            );
            let group_name = group_from_id(&existing.id)?;
            return Ok(NetworkWatcher {
                id: existing.id.clone(),
                name: existing.name.clone(),
                group_name,
            });
        }

        let name = format!("nw-probe-{region}");
        log::info!("No network watcher in {region}; creating '{name}'");
        let path = self.network_path(group, &format!("networkWatchers/{name}"));
        let body = self
            .arm
            .send(
                Method::PUT,
                &path,
                NETWORK_API_VERSION,
                Some(json!({ "location": region })),
            )
            .await?;
        let parsed: ResourceBody = parse_typed(body)?;
        Ok(NetworkWatcher {
            id: parsed.id,
            name: parsed.name,
            group_name: group.to_string(),
        })
    }

    async fn check_connectivity(
        &self,
        watcher: &NetworkWatcher,
        probe: &ProbeRequest,
    ) -> Result<ConnectivityResult, Box<dyn Error + Send + Sync>> {
        let path = self.network_path(
            &watcher.group_name,
            &format!("networkWatchers/{}/connectivityCheck", watcher.name),
        );
        let body = json!({
            "source": { "resourceId": probe.source_vm_id },
            "destination": { "resourceId": probe.dest_vm_id, "port": probe.port }
        });
        let body = self
            .arm
            .send(Method::POST, &path, NETWORK_API_VERSION, Some(body))
            .await?;
        let info: ConnectivityInformation = parse_typed(body)?;

        Ok(ConnectivityResult {
            source_vm_id: probe.source_vm_id.clone(),
            dest_vm_id: probe.dest_vm_id.clone(),
            port: probe.port,
            status: ConnectivityStatus::from_connection_status(&info.connection_status),
            avg_latency_ms: info.avg_latency_in_ms,
            probes_sent: info.probes_sent,
            probes_failed: info.probes_failed,
        })
    }

    async fn delete_resource_group(
        &self,
        name: &str,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.arm
            .send(
                Method::DELETE,
                &self.group_path(name),
                RESOURCE_API_VERSION,
                None,
            )
            .await?;
        Ok(())
    }
}

/// Extract the resource-group segment from a full resource id.
fn group_from_id(resource_id: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut segments = resource_id.split('/');
    while let Some(segment) = segments.next() {
        if segment.eq_ignore_ascii_case("resourceGroups") {
            return match segments.next() {
                Some(group) if !group.is_empty() => Ok(group.to_string()),
                _ => Err(format!("Resource id has empty group segment: {resource_id}").into()),
            };
        }
    }
    Err(format!("Resource id has no resource group: {resource_id}").into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_from_id() {
        let id = "/subscriptions/sub-1/resourceGroups/NetworkWatcherRG/providers/Microsoft.Network/networkWatchers/NetworkWatcher_eastus";
        assert_eq!(group_from_id(id).unwrap(), "NetworkWatcherRG");
        assert!(group_from_id("/subscriptions/sub-1").is_err());
    }

    #[test]
    fn test_connectivity_information_parses_service_payload() {
        let payload = serde_json::json!({
            "connectionStatus": "Reachable",
            "avgLatencyInMs": 4,
            "minLatencyInMs": 2,
            "maxLatencyInMs": 15,
            "probesSent": 100,
            "probesFailed": 0,
            "hops": []
        });
        let info: ConnectivityInformation = parse_typed(payload).unwrap();
        assert_eq!(info.connection_status, "Reachable");
        assert_eq!(info.avg_latency_in_ms, Some(4));
        assert_eq!(info.probes_sent, Some(100));
        assert_eq!(info.probes_failed, Some(0));
    }

    #[test]
    fn test_connectivity_information_tolerates_missing_counters() {
        let payload = serde_json::json!({ "connectionStatus": "Unreachable" });
        let info: ConnectivityInformation = parse_typed(payload).unwrap();
        assert_eq!(info.avg_latency_in_ms, None);
        assert_eq!(info.probes_sent, None);
    }
}
