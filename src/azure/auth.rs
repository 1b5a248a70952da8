//! Credential construction for the management API.
//!
//! `DefaultAzureCredential` consumes the same four `AZURE_*` environment
//! variables that [`crate::config::Settings`] validates, so a missing value is
//! reported before any token request is attempted.

use azure_core::auth::TokenCredential;
use azure_identity::DefaultAzureCredential;
use std::sync::Arc;

/// OAuth scope for Azure Resource Manager.
pub const MANAGEMENT_SCOPE: &str = "https://management.azure.com/.default";

/// Build the token credential used for every management call.
pub fn build_credential() -> Arc<dyn TokenCredential> {
    Arc::new(DefaultAzureCredential::default())
}
