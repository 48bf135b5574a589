//! Error types and handling for saltsolo
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Every variant belongs to exactly one [`ErrorCategory`]. All of them are
//! fatal to the provisioning run that raised them; nothing here is retried.
//!
//! Constructors are grouped by category:
//! - [`config`]: configuration resolution errors
//! - [`data_source`]: mine, grains and template source errors
//! - [`sandbox`]: errors while materializing the sandbox tree
//! - [`command`]: command synthesis errors

pub mod command;
pub mod config;
pub mod data_source;
pub mod sandbox;


use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

/// Broad classification of a [`SaltError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    DataSource,
    Sandbox,
    CommandSynthesis,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Config => "configuration",
            Self::DataSource => "data source",
            Self::Sandbox => "sandbox",
            Self::CommandSynthesis => "command synthesis",
        };
        f.write_str(name)
    }
}

/// Main error type for saltsolo operations
#[derive(Error, Diagnostic, Debug)]
pub enum SaltError {
    // Configuration errors
    #[error("Missing required configuration key: {key}")]
    #[diagnostic(
        code(saltsolo::config::missing_key),
        help("Set '{key}' in the configuration file or pass it with --set {key}=<value>")
    )]
    ConfigMissingKey { key: String },

    #[error("Unknown configuration key: {key}")]
    #[diagnostic(
        code(saltsolo::config::unknown_key),
        help("Run 'saltsolo config --defaults' to list every supported option")
    )]
    ConfigUnknownKey { key: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(saltsolo::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(saltsolo::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Failed to read configuration file: {path}: {reason}")]
    #[diagnostic(code(saltsolo::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    // Data source errors
    #[error("Data source not found: {path}")]
    #[diagnostic(
        code(saltsolo::data_source::not_found),
        help("Check the path listed under mine-from-files, mock-mine or external-mine")
    )]
    DataSourceNotFound { path: String },

    #[error("Failed to parse data source: {path}: {reason}")]
    #[diagnostic(
        code(saltsolo::data_source::parse_failed),
        help("Mine data files must contain a YAML mapping at the top level")
    )]
    DataSourceParseFailed { path: String, reason: String },

    #[error("Failed to render template '{template}': {reason}")]
    #[diagnostic(code(saltsolo::data_source::render_failed))]
    TemplateRenderFailed { template: String, reason: String },

    // Sandbox errors
    #[error("Failed to read template: {path}: {reason}")]
    #[diagnostic(code(saltsolo::sandbox::template_read_failed))]
    TemplateReadFailed { path: String, reason: String },

    #[error("Failed to read sandbox source: {path}: {reason}")]
    #[diagnostic(code(saltsolo::sandbox::read_failed))]
    SandboxReadFailed { path: String, reason: String },

    #[error("Failed to write sandbox entry: {path}: {reason}")]
    #[diagnostic(
        code(saltsolo::sandbox::write_failed),
        help("The partially written sandbox is not usable; discard it and retry the run")
    )]
    SandboxWriteFailed { path: String, reason: String },

    #[error("Sandbox entry written twice: {path}")]
    #[diagnostic(
        code(saltsolo::sandbox::duplicate_entry),
        help("Two artifacts resolve to the same sandbox path; rename one of the sources")
    )]
    SandboxDuplicateEntry { path: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(saltsolo::sandbox::io_error))]
    IoError { message: String },

    // Command synthesis errors
    #[error("Unsupported command combination: {os} with salt {version}")]
    #[diagnostic(
        code(saltsolo::command::unsupported),
        help("Output scanning needs a POSIX shell; pin salt_version above 0.17.5 on Windows")
    )]
    CommandUnsupported { os: String, version: String },

    #[error("Invalid package spec template '{template}': {reason}")]
    #[diagnostic(
        code(saltsolo::command::package_spec),
        help("pip_pkg must contain '%s' where the version goes, e.g. salt==%s")
    )]
    PackageSpecInvalid { template: String, reason: String },
}

impl SaltError {
    /// Category this error belongs to
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigMissingKey { .. }
            | Self::ConfigUnknownKey { .. }
            | Self::ConfigInvalid { .. }
            | Self::ConfigParseFailed { .. }
            | Self::ConfigReadFailed { .. } => ErrorCategory::Config,
            Self::DataSourceNotFound { .. }
            | Self::DataSourceParseFailed { .. }
            | Self::TemplateRenderFailed { .. } => ErrorCategory::DataSource,
            Self::TemplateReadFailed { .. }
            | Self::SandboxReadFailed { .. }
            | Self::SandboxWriteFailed { .. }
            | Self::SandboxDuplicateEntry { .. }
            | Self::IoError { .. } => ErrorCategory::Sandbox,
            Self::CommandUnsupported { .. } | Self::PackageSpecInvalid { .. } => {
                ErrorCategory::CommandSynthesis
            }
        }
    }
}

impl From<std::io::Error> for SaltError {
    fn from(err: std::io::Error) -> Self {
        SaltError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for SaltError {
    fn from(err: serde_yaml::Error) -> Self {
        SaltError::ConfigInvalid {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, SaltError>;
