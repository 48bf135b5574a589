//! Command implementations for the saltsolo CLI

pub mod steps;
pub mod completions;
pub mod config;
mod helpers;
pub mod sandbox;
pub mod version;
