//! Unconditional cleanup of the demo resource group.

use crate::provider::Provider;

/// What provisioning left behind for teardown to consume.
///
/// Produced explicitly by the provisioning phase so the "nothing to clean up"
/// branch is a value, not a null check against shared state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeardownTarget {
    /// A resource group was created and must be deleted.
    Group(String),
    /// Provisioning failed before the group existed.
    Nothing,
}

/// Delete whatever the run created.
///
/// Never returns an error: a teardown failure is logged so it cannot mask the
/// original provisioning failure from the operator.
pub async fn delete_group(provider: &dyn Provider, target: TeardownTarget) {
    match target {
        TeardownTarget::Nothing => {
            log::info!("No resource group was created; nothing to clean up");
        }
        TeardownTarget::Group(name) => match provider.delete_resource_group(&name).await {
            Ok(()) => log::info!("Deleted resource group '{name}'"),
            Err(e) => log::error!("Failed to delete resource group '{name}': {e}"),
        },
    }
}
