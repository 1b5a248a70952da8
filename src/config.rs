//! Process configuration and the fixed demo plan.
//!
//! The only process inputs are the four Azure credential values read from the
//! environment (`.env` supported via dotenv). Everything else the run needs is
//! a fixed plan: names, region, address prefixes and the probe port.

use crate::models::{
    AdminCredentials, ImageReference, VirtualMachineSpec, VirtualNetworkSpec,
};
use regex::Regex;
use std::env;
use std::error::Error;
use std::sync::OnceLock;

/// Base interval for long-running-operation polling.
pub const POLL_MSEC: u64 = 2_000;

/// Destination TCP port probed in both directions (SSH).
pub const PROBE_PORT: u16 = 22;

/// Environment variables required to authenticate against the management API.
pub const REQUIRED_ENV: [&str; 4] = [
    "AZURE_TENANT_ID",
    "AZURE_CLIENT_ID",
    "AZURE_CLIENT_SECRET",
    "AZURE_SUBSCRIPTION_ID",
];

// Demo-only admin credentials; the whole resource group is deleted at the end
// of every run.
const ADMIN_USERNAME: &str = "probeadmin";
const ADMIN_PASSWORD: &str = "Pr0be!demo-2468";

/// Regex for Azure resource-group style names: alphanumerics, underscores,
/// periods, hyphens and parentheses, not ending in a period, max 90 chars.
static RESOURCE_NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn resource_name_regex() -> &'static Regex {
    RESOURCE_NAME_REGEX
        .get_or_init(|| Regex::new(r"^[-\w.()]{0,89}[-\w()]$").expect("Invalid Regex"))
}

/// Validate a resource name against the provider's name grammar.
pub fn validate_resource_name(name: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
    if resource_name_regex().is_match(name) {
        Ok(())
    } else {
        Err(format!("Invalid resource name: '{name}'").into())
    }
}

/// Credential-related process configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub tenant_id: String,
    pub client_id: String,
    pub subscription_id: String,
}

impl Settings {
    /// Read the four required values from the environment.
    ///
    /// All missing variables are reported in a single error so the operator
    /// can fix the environment in one pass.
    pub fn from_env() -> Result<Settings, Box<dyn Error + Send + Sync>> {
        let missing: Vec<&str> = REQUIRED_ENV
            .iter()
            .filter(|name| env::var(name).map(|v| v.is_empty()).unwrap_or(true))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            )
            .into());
        }

        // The client secret stays in the environment; only azure_identity
        // reads it when requesting tokens.
        Ok(Settings {
            tenant_id: env::var("AZURE_TENANT_ID")?,
            client_id: env::var("AZURE_CLIENT_ID")?,
            subscription_id: env::var("AZURE_SUBSCRIPTION_ID")?,
        })
    }
}

/// Everything one demo run provisions, probes and tears down.
#[derive(Debug, Clone)]
pub struct DemoPlan {
    pub group_name: String,
    pub region: String,
    pub networks: [VirtualNetworkSpec; 2],
    pub machines: [VirtualMachineSpec; 2],
    /// Peering name, shared by both directional records.
    pub peering_name: String,
    pub probe_port: u16,
}

impl DemoPlan {
    /// The fixed two-network / two-machine demo layout.
    pub fn demo() -> Result<DemoPlan, Box<dyn Error + Send + Sync>> {
        let networks = [
            VirtualNetworkSpec::new("vnet-probe-a", "10.0.0.0/27", "snet-probe-a", "10.0.0.0/27")?,
            VirtualNetworkSpec::new("vnet-probe-b", "10.1.0.0/27", "snet-probe-b", "10.1.0.0/27")?,
        ];
        let machines = [
            machine_spec("vm-probe-a", "nic-probe-a"),
            machine_spec("vm-probe-b", "nic-probe-b"),
        ];

        let plan = DemoPlan {
            group_name: "rg-peering-probe".to_string(),
            region: "eastus".to_string(),
            networks,
            machines,
            peering_name: "peer-probe-ab".to_string(),
            probe_port: PROBE_PORT,
        };
        plan.validate()?;
        Ok(plan)
    }

    /// Check names and the address-space invariant before any provider call.
    pub fn validate(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        validate_resource_name(&self.group_name)?;
        validate_resource_name(&self.peering_name)?;
        for net in &self.networks {
            validate_resource_name(&net.name)?;
            validate_resource_name(&net.subnet_name)?;
        }
        for vm in &self.machines {
            validate_resource_name(&vm.name)?;
            validate_resource_name(&vm.nic_name)?;
        }
        ensure_disjoint(&self.networks[0], &self.networks[1])?;
        Ok(())
    }
}

fn machine_spec(name: &str, nic_name: &str) -> VirtualMachineSpec {
    VirtualMachineSpec {
        name: name.to_string(),
        nic_name: nic_name.to_string(),
        size: "Standard_B1s".to_string(),
        image: ImageReference::ubuntu_lts(),
        admin: AdminCredentials {
            username: ADMIN_USERNAME.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        },
    }
}

/// Error unless neither network's address space nor subnet overlaps the other's.
///
/// Peering two networks with overlapping space is meaningless; the provider
/// would accept some of the calls and routing would still be broken.
pub fn ensure_disjoint(
    a: &VirtualNetworkSpec,
    b: &VirtualNetworkSpec,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let pairs = [
        (a.address_prefix, b.address_prefix),
        (a.address_prefix, b.subnet_prefix),
        (a.subnet_prefix, b.address_prefix),
        (a.subnet_prefix, b.subnet_prefix),
    ];
    for (x, y) in pairs {
        if x.overlaps(&y) {
            return Err(format!(
                "Address spaces of '{}' and '{}' overlap: {x} vs {y}",
                a.name, b.name
            )
            .into());
        }
    }
    Ok(())
}
