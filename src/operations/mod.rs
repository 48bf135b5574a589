//! High-level operations coordinating the provisioning stages
//!
//! - Provisioner: install plan, sandbox materialization, command synthesis

pub mod provision;

pub use provision::{ProvisionOutput, Provisioner};
