//! Virtual machine, network interface and extension descriptors.

/// Reference to a marketplace OS image (publisher/offer/sku/version).
#[derive(Debug, Clone)]
pub struct ImageReference {
    pub publisher: String,
    pub offer: String,
    pub sku: String,
    pub version: String,
}

impl ImageReference {
    /// Ubuntu Server LTS, the image the demo machines boot from.
    pub fn ubuntu_lts() -> ImageReference {
        ImageReference {
            publisher: "Canonical".to_string(),
            offer: "0001-com-ubuntu-server-jammy".to_string(),
            sku: "22_04-lts-gen2".to_string(),
            version: "latest".to_string(),
        }
    }
}

/// Desired state for a network interface bound to one subnet.
#[derive(Debug, Clone)]
pub struct NetworkInterfaceSpec {
    /// Name of the interface.
    pub name: String,
    /// Provider resource id of the subnet the interface attaches to.
    pub subnet_id: String,
}

/// A provisioned network interface.
#[derive(Debug, Clone)]
pub struct NetworkInterface {
    pub id: String,
    pub name: String,
}

/// Admin credentials for the machine's OS profile.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

/// Desired state for one virtual machine.
#[derive(Debug, Clone)]
pub struct VirtualMachineSpec {
    /// Name of the machine.
    pub name: String,
    /// Name for the machine's network interface.
    pub nic_name: String,
    /// VM size (e.g. "Standard_B1s").
    pub size: String,
    /// Base OS image.
    pub image: ImageReference,
    /// Admin credentials.
    pub admin: AdminCredentials,
}

/// A provisioned virtual machine.
#[derive(Debug, Clone)]
pub struct VirtualMachine {
    /// Provider resource id, used as probe endpoint.
    pub id: String,
    pub name: String,
}

/// Desired state for a VM extension (publisher/type/version tuple).
#[derive(Debug, Clone)]
pub struct VmExtensionSpec {
    /// Name of the extension resource.
    pub name: String,
    pub publisher: String,
    /// Extension type, e.g. "NetworkWatcherAgentLinux".
    pub type_name: String,
    pub type_handler_version: String,
}

impl VmExtensionSpec {
    /// The Network Watcher agent required before connectivity checks can target a VM.
    pub fn network_watcher_agent() -> VmExtensionSpec {
        VmExtensionSpec {
            name: "NetworkWatcherAgent".to_string(),
            publisher: "Microsoft.Azure.NetworkWatcher".to_string(),
            type_name: "NetworkWatcherAgentLinux".to_string(),
            type_handler_version: "1.4".to_string(),
        }
    }
}
