//! Domain models for the peering probe.
//!
//! This module contains the core data structures used throughout the application:
//! - [`Ipv4`] - IPv4 address prefix with CIDR notation support
//! - [`network`] - Virtual network descriptors
//! - [`compute`] - Virtual machine, NIC and extension descriptors
//! - [`peering`] - Peering records and flags
//! - [`connectivity`] - Probe requests and verdicts

mod compute;
mod connectivity;
mod ipv4;
mod network;
mod peering;

// Re-export public types
pub use compute::{
    AdminCredentials, ImageReference, NetworkInterface, NetworkInterfaceSpec, VirtualMachine,
    VirtualMachineSpec, VmExtensionSpec,
};
pub use connectivity::{ConnectivityResult, ConnectivityStatus, ProbeRequest};
pub use ipv4::{broadcast_addr, cut_addr, get_cidr_mask, Ipv4, MAX_LENGTH};
pub use network::{VirtualNetwork, VirtualNetworkSpec};
pub use peering::{PeeringProperties, PeeringSpec, PeeringState, ResourceRef};
