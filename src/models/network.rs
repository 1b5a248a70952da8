//! Virtual network descriptors.

use super::Ipv4;
use std::error::Error;

/// Desired state for one isolated virtual network with a single subnet.
#[derive(Debug, Clone)]
pub struct VirtualNetworkSpec {
    /// Name of the virtual network.
    pub name: String,
    /// Address prefix of the whole network.
    pub address_prefix: Ipv4,
    /// Name of the single subnet.
    pub subnet_name: String,
    /// Address prefix of the subnet, contained in `address_prefix`.
    pub subnet_prefix: Ipv4,
}

impl VirtualNetworkSpec {
    pub fn new(
        name: &str,
        address_prefix: &str,
        subnet_name: &str,
        subnet_prefix: &str,
    ) -> Result<VirtualNetworkSpec, Box<dyn Error + Send + Sync>> {
        let address_prefix = Ipv4::new(address_prefix)?;
        let subnet_prefix = Ipv4::new(subnet_prefix)?;
        let contained = address_prefix.lo() <= subnet_prefix.lo()
            && subnet_prefix.hi() <= address_prefix.hi();
        if !contained {
            return Err(format!(
                "Subnet {subnet_prefix} lies outside network prefix {address_prefix}"
            )
            .into());
        }
        Ok(VirtualNetworkSpec {
            name: name.to_string(),
            address_prefix,
            subnet_name: subnet_name.to_string(),
            subnet_prefix,
        })
    }
}

/// A provisioned virtual network, as returned by the provider.
#[derive(Debug, Clone)]
pub struct VirtualNetwork {
    /// Provider resource id of the network.
    pub id: String,
    /// Name of the network.
    pub name: String,
    /// Provider resource id of the single subnet.
    pub subnet_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subnet_must_sit_inside_network() {
        let spec = VirtualNetworkSpec::new("vnet-a", "10.0.0.0/27", "snet-a", "10.0.0.0/27");
        assert!(spec.is_ok());

        let outside = VirtualNetworkSpec::new("vnet-a", "10.0.0.0/27", "snet-a", "10.1.0.0/27");
        assert!(outside.is_err());
    }
}
