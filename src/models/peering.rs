//! Virtual network peering descriptors.

use serde::{Deserialize, Serialize};

/// Reference to another resource by id, as used inside ARM payloads.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub id: String,
}

/// Desired state for one directional peering record.
#[derive(Debug, Clone)]
pub struct PeeringSpec {
    /// Name of the peering; shared between both directions.
    pub name: String,
    /// Resource id of the remote virtual network.
    pub remote_network_id: String,
    pub allow_virtual_network_access: bool,
    pub allow_forwarded_traffic: bool,
    pub allow_gateway_transit: bool,
    pub use_remote_gateways: bool,
}

impl PeeringSpec {
    /// The demo's initial permissive peering: access and forwarded traffic on,
    /// no gateway transit in either direction.
    pub fn permissive(name: &str, remote_network_id: &str) -> PeeringSpec {
        PeeringSpec {
            name: name.to_string(),
            remote_network_id: remote_network_id.to_string(),
            allow_virtual_network_access: true,
            allow_forwarded_traffic: true,
            allow_gateway_transit: false,
            use_remote_gateways: false,
        }
    }
}

/// Mutable properties of an existing peering record, fetched before an update.
///
/// Unmodelled fields survive a fetch/update round-trip through `extra`, so an
/// update only ever changes the fields the caller touched.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PeeringProperties {
    pub remote_virtual_network: ResourceRef,
    pub allow_virtual_network_access: bool,
    pub allow_forwarded_traffic: bool,
    pub allow_gateway_transit: bool,
    pub use_remote_gateways: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// An existing peering record as fetched from the provider.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PeeringState {
    pub name: String,
    pub properties: PeeringProperties,
}

impl PeeringState {
    /// Turn off cross-network access, leaving every other field as fetched.
    pub fn revoke_access(&mut self) {
        self.properties.allow_virtual_network_access = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revoke_access_touches_only_the_access_flag() {
        let json = r#"{
            "name": "peer-probe-ab",
            "properties": {
                "remoteVirtualNetwork": { "id": "/subscriptions/s/virtualNetworks/vnet-b" },
                "allowVirtualNetworkAccess": true,
                "allowForwardedTraffic": true,
                "allowGatewayTransit": false,
                "useRemoteGateways": false,
                "peeringState": "Connected",
                "provisioningState": "Succeeded"
            }
        }"#;
        let fetched: PeeringState = serde_json::from_str(json).unwrap();
        let mut updated = fetched.clone();
        updated.revoke_access();

        assert!(!updated.properties.allow_virtual_network_access);
        assert_eq!(
            updated.properties.allow_forwarded_traffic,
            fetched.properties.allow_forwarded_traffic
        );
        assert_eq!(
            updated.properties.allow_gateway_transit,
            fetched.properties.allow_gateway_transit
        );
        assert_eq!(
            updated.properties.use_remote_gateways,
            fetched.properties.use_remote_gateways
        );
        assert_eq!(
            updated.properties.remote_virtual_network,
            fetched.properties.remote_virtual_network
        );
        // Fields outside the model ride along unchanged.
        assert_eq!(updated.properties.extra, fetched.properties.extra);
        assert_eq!(
            updated.properties.extra.get("peeringState"),
            Some(&serde_json::json!("Connected"))
        );
    }

    #[test]
    fn test_serde_round_trip_preserves_unknown_fields() {
        let json = serde_json::json!({
            "name": "peer-probe-ab",
            "properties": {
                "remoteVirtualNetwork": { "id": "/x" },
                "allowVirtualNetworkAccess": true,
                "allowForwardedTraffic": true,
                "allowGatewayTransit": false,
                "useRemoteGateways": false,
                "doNotVerifyRemoteGateways": true
            }
        });
        let state: PeeringState = serde_json::from_value(json.clone()).unwrap();
        let back = serde_json::to_value(&state).unwrap();
        assert_eq!(back, json);
    }
}
