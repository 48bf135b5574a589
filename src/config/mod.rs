//! Configuration resolution for saltsolo
//!
//! The effective configuration is built once per provisioning run from three
//! layers, highest precedence first:
//! - run-computed values (sandbox location, target OS, `--set` flags)
//! - user overrides (the YAML configuration file)
//! - documented defaults ([`defaults::default_layer`])
//!
//! Layers are merged on top-level keys only. The schema is closed: unknown
//! keys are rejected and every key without a default must be supplied.

pub mod defaults;
pub mod layer;
pub mod types;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::common::paths::remote_join;
use crate::error::{Result, config};

pub use defaults::{RETCODE_VERSION, default_layer_for};

#[cfg(test)]
pub use defaults::default_layer;
pub use layer::ConfigLayer;
pub use types::{
    Dependency, DependencyKind, InstallMethod, OsFamily, RepoKind, SaltVersion, VendorRepo,
};

/// Schema entry for one option
#[derive(Debug, Clone, Copy)]
pub struct KeySpec {
    pub name: &'static str,
    /// Must be present (from any layer) after merging
    pub required: bool,
}

const fn required(name: &'static str) -> KeySpec {
    KeySpec {
        name,
        required: true,
    }
}

const fn optional(name: &'static str) -> KeySpec {
    KeySpec {
        name,
        required: false,
    }
}

/// Every option the resolver accepts
pub const KEYS: &[KeySpec] = &[
    required("sandbox_path"),
    required("os"),
    required("salt_install"),
    required("salt_version"),
    required("salt_bootstrap_url"),
    required("salt_bootstrap_options"),
    required("install_after_init_environment"),
    required("init_environment"),
    required("pip_pkg"),
    required("pip_bin"),
    required("pip_editable"),
    required("pip_index_url"),
    required("pip_extra_index_url"),
    required("salt_config"),
    required("salt_minion_config"),
    optional("salt_minion_config_template"),
    required("salt_minion_extra_config"),
    required("salt_minion_config_dropin_files"),
    optional("salt_minion_id"),
    required("salt_file_root"),
    required("salt_pillar_root"),
    required("salt_state_top"),
    required("salt_spm_root"),
    required("salt_env"),
    required("salt_mine_root"),
    required("salt_mock_mine_root"),
    required("salt_mock_remote_functions_root"),
    required("salt_force_color"),
    optional("log_level"),
    required("dry_run"),
    required("root_path"),
    required("sudo"),
    required("sudo_command"),
    optional("grains"),
    optional("data_path"),
    required("salt_copy_filter"),
    required("dependencies"),
    required("vendor_repo"),
    optional("state_top"),
    optional("pillars"),
    optional("pillars-from-files"),
    optional("mine"),
    required("mine-from-files"),
    required("external-mine"),
    optional("mock-mine"),
    optional("mock-remote-functions"),
    optional("mock-state-module"),
];

/// The resolved, read-only configuration for one provisioning run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaltConfig {
    /// Local directory the sandbox tree is written into
    pub sandbox_path: PathBuf,
    pub os: OsFamily,

    pub salt_install: InstallMethod,
    pub salt_version: SaltVersion,
    /// Remote URL or local path of the bootstrap script
    pub salt_bootstrap_url: String,
    pub salt_bootstrap_options: String,
    pub install_after_init_environment: bool,
    pub init_environment: String,
    /// Package template (`salt==%s`) or a local sdist path
    pub pip_pkg: String,
    pub pip_bin: String,
    pub pip_editable: bool,
    pub pip_index_url: String,
    pub pip_extra_index_url: Vec<String>,

    pub salt_config: String,
    pub salt_minion_config: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt_minion_config_template: Option<PathBuf>,
    pub salt_minion_extra_config: Mapping,
    pub salt_minion_config_dropin_files: Vec<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt_minion_id: Option<String>,
    pub salt_file_root: String,
    pub salt_pillar_root: String,
    /// Remote path of the state top file written from `state_top`
    pub salt_state_top: String,
    pub salt_spm_root: String,
    pub salt_env: String,
    pub salt_mine_root: String,
    pub salt_mock_mine_root: String,
    pub salt_mock_remote_functions_root: String,

    pub salt_force_color: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    pub dry_run: bool,
    /// Directory on the target host the sandbox is uploaded to
    pub root_path: String,
    pub sudo: bool,
    pub sudo_command: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grains: Option<Mapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<PathBuf>,
    pub salt_copy_filter: Vec<String>,
    pub dependencies: Vec<Dependency>,
    pub vendor_repo: Vec<VendorRepo>,

    /// Contents of the state top file
    #[serde(default, deserialize_with = "null_as_default")]
    pub state_top: Mapping,
    /// Pillar files keyed by name below `salt_pillar_root` (`top.sls`, `users.sls`)
    #[serde(default, deserialize_with = "null_as_default")]
    pub pillars: Mapping,
    /// Local pillar files copied below `salt_pillar_root`, keyed by target name
    #[serde(
        rename = "pillars-from-files",
        default,
        deserialize_with = "null_as_default"
    )]
    pub pillars_from_files: BTreeMap<String, PathBuf>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub mine: Mapping,
    #[serde(rename = "mine-from-files")]
    pub mine_from_files: Vec<PathBuf>,
    #[serde(rename = "external-mine")]
    pub external_mine: BTreeMap<String, PathBuf>,
    #[serde(
        rename = "mock-mine",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub mock_mine: Option<PathBuf>,
    #[serde(
        rename = "mock-remote-functions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub mock_remote_functions: Option<PathBuf>,
    #[serde(
        rename = "mock-state-module",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub mock_state_module: Option<PathBuf>,
}

/// Merge the three layers into an effective configuration
///
/// Precedence is `computed` > `overrides` > `defaults`.
pub fn resolve(
    defaults: &ConfigLayer,
    overrides: &ConfigLayer,
    computed: &ConfigLayer,
) -> Result<SaltConfig> {
    let mut merged = defaults.clone();
    merged.overlay(overrides);
    merged.overlay(computed);

    if let Some(unknown) = merged.keys().find(|key| !is_known_key(key)) {
        return Err(config::unknown_key(unknown));
    }

    for entry in KEYS.iter().filter(|entry| entry.required) {
        let present = matches!(merged.get(entry.name), Some(value) if !value.is_null());
        if !present {
            return Err(config::missing_key(entry.name));
        }
    }

    let config: SaltConfig = serde_yaml::from_value(Value::Mapping(merged.into_mapping()))
        .map_err(|e| config::invalid(e.to_string()))?;

    debug!(
        install = %config.salt_install,
        version = %config.salt_version,
        os = %config.os,
        "resolved configuration"
    );

    Ok(config)
}

/// Read an explicit null as the type's empty value
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn is_known_key(key: &str) -> bool {
    KEYS.iter().any(|entry| entry.name == key)
}

impl SaltConfig {
    pub fn install_method(&self) -> InstallMethod {
        self.salt_install
    }

    pub fn version(&self) -> &SaltVersion {
        &self.salt_version
    }

    pub fn os(&self) -> OsFamily {
        self.os
    }

    pub fn is_windows(&self) -> bool {
        self.os == OsFamily::Windows
    }

    /// Remote path of the minion config file
    pub fn minion_config_path(&self) -> &str {
        &self.salt_minion_config
    }

    /// Where a configured remote path ends up on the target host: under
    /// `root_path`, in the target's separator dialect
    pub fn remote_path(&self, path: &str) -> String {
        self.os.translate(&remote_join(&self.root_path, path))
    }

    pub fn sandbox_root(&self) -> &Path {
        &self.sandbox_path
    }

    /// Grains mapping, if one was configured
    pub fn grains(&self) -> Option<&Mapping> {
        self.grains.as_ref()
    }

    /// Extra minion options with every key rendered as a string
    pub fn minion_extra_config(&self) -> Mapping {
        self.salt_minion_extra_config
            .iter()
            .map(|(key, value)| (Value::String(stringify_key(key)), value.clone()))
            .collect()
    }

    /// Vendor repositories served through spm
    pub fn spm_repos(&self) -> impl Iterator<Item = &VendorRepo> {
        self.vendor_repo
            .iter()
            .filter(|repo| repo.kind == RepoKind::Spm)
    }

    /// Serialize the effective configuration for display
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn stringify_key(key: &Value) -> String {
    match key {
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|text| text.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests;
