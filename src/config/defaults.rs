//! Documented default values for every option that has one
//!
//! Options without a default (`grains`, `salt_minion_id`, `data_path`, ...)
//! are deliberately left out so they stay absent unless a user sets them.

use serde_yaml::{Mapping, Value};

use super::{ConfigLayer, OsFamily};

/// Salt version from which `salt-call --retcode-passthrough` is trusted
pub const RETCODE_VERSION: &str = "0.17.5";

pub const DEFAULT_BOOTSTRAP_URL: &str = "https://bootstrap.saltstack.com";
pub const DEFAULT_PIP_PKG: &str = "salt==%s";
pub const DEFAULT_PIP_INDEX_URL: &str = "https://pypi.python.org/simple/";
pub const DEFAULT_ROOT_PATH: &str = "/tmp/kitchen";
pub const DEFAULT_WINDOWS_ROOT_PATH: &str = "$env:TEMP\\kitchen";

/// Build the default configuration layer
///
/// Returns a fresh value on every call.
pub fn default_layer() -> ConfigLayer {
    let mut layer = ConfigLayer::new();
    layer
        // installation
        .set("salt_install", "bootstrap")
        .set("salt_version", "latest")
        .set("salt_bootstrap_url", DEFAULT_BOOTSTRAP_URL)
        .set("salt_bootstrap_options", "")
        .set("install_after_init_environment", false)
        .set("init_environment", "")
        .set("pip_pkg", DEFAULT_PIP_PKG)
        .set("pip_bin", "pip")
        .set("pip_editable", false)
        .set("pip_index_url", DEFAULT_PIP_INDEX_URL)
        .set("pip_extra_index_url", Value::Sequence(Vec::new()))
        // minion layout
        .set("salt_config", "/etc/salt")
        .set("salt_minion_config", "/etc/salt/minion")
        .set("salt_minion_extra_config", Value::Mapping(Mapping::new()))
        .set("salt_minion_config_dropin_files", Value::Sequence(Vec::new()))
        .set("salt_file_root", "/srv/salt")
        .set("salt_pillar_root", "/srv/pillar")
        .set("salt_state_top", "/srv/salt/top.sls")
        .set("salt_spm_root", "/srv/spm")
        .set("salt_env", "base")
        .set("salt_mine_root", "/srv/mine")
        .set("salt_mock_mine_root", "/srv/mine")
        .set("salt_mock_remote_functions_root", "/srv/remote_functions")
        // invocation
        .set("salt_force_color", false)
        .set("dry_run", false)
        .set("root_path", DEFAULT_ROOT_PATH)
        .set("sudo", true)
        .set("sudo_command", "sudo -E")
        // sandbox content
        .set("salt_copy_filter", Value::Sequence(Vec::new()))
        .set("dependencies", Value::Sequence(Vec::new()))
        .set("vendor_repo", Value::Sequence(Vec::new()))
        .set("state_top", Value::Mapping(Mapping::new()))
        .set("pillars", Value::Mapping(Mapping::new()))
        .set("pillars-from-files", Value::Mapping(Mapping::new()))
        .set("mine", Value::Mapping(Mapping::new()))
        .set("mine-from-files", Value::Sequence(Vec::new()))
        .set("external-mine", Value::Mapping(Mapping::new()));
    layer
}

/// Defaults adjusted for the target OS
///
/// Windows hosts stage the sandbox under the user's temp directory.
pub fn default_layer_for(os: OsFamily) -> ConfigLayer {
    let mut layer = default_layer();
    if os == OsFamily::Windows {
        layer.set("root_path", DEFAULT_WINDOWS_ROOT_PATH);
    }
    layer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KEYS;

    #[test]
    fn test_defaults_only_use_known_keys() {
        let layer = default_layer();
        for key in layer.keys() {
            assert!(
                KEYS.iter().any(|entry| entry.name == key),
                "default for unknown key '{key}'"
            );
        }
    }

    #[test]
    fn test_defaults_leave_optional_keys_absent() {
        let layer = default_layer();
        for key in ["grains", "salt_minion_id", "log_level", "data_path", "mock-mine"] {
            assert!(!layer.contains(key), "'{key}' should have no default");
        }
    }

    #[test]
    fn test_windows_root_path() {
        assert_eq!(
            default_layer_for(OsFamily::Windows).get("root_path"),
            Some(&Value::from("$env:TEMP\\kitchen"))
        );
        assert_eq!(default_layer_for(OsFamily::Posix), default_layer());
    }

    #[test]
    fn test_defaults_are_fresh_per_call() {
        let mut first = default_layer();
        first.set("salt_version", "2017.7.0");
        assert_eq!(
            default_layer().get("salt_version"),
            Some(&Value::from("latest"))
        );
    }
}
