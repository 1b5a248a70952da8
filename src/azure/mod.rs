//! Azure Resource Manager interaction.
//!
//! This module holds the live side of the provider seam:
//! - [`auth`] - Credential construction
//! - [`arm`] - REST calls and long-running-operation polling
//! - [`client`] - The [`ArmProvider`] management operations

mod arm;
mod auth;
mod client;

// Re-export public types and functions
pub use arm::{parse_typed, ArmClient};
pub use auth::{build_credential, MANAGEMENT_SCOPE};
pub use client::ArmProvider;
