//! Resolver tests

use super::*;
use crate::error::SaltError;

fn computed() -> ConfigLayer {
    let mut layer = ConfigLayer::new();
    layer
        .set("sandbox_path", "/tmp/sandbox")
        .set("os", "posix");
    layer
}

fn overrides(yaml: &str) -> ConfigLayer {
    ConfigLayer::from_yaml_str(yaml).unwrap()
}

#[test]
fn test_resolve_defaults_only() {
    let config = resolve(&default_layer(), &ConfigLayer::new(), &computed()).unwrap();

    assert_eq!(config.install_method(), InstallMethod::Bootstrap);
    assert_eq!(*config.version(), SaltVersion::Latest);
    assert_eq!(config.os(), OsFamily::Posix);
    assert_eq!(config.salt_minion_config, "/etc/salt/minion");
    assert_eq!(config.root_path, "/tmp/kitchen");
    assert!(config.grains().is_none());
    assert!(config.salt_minion_id.is_none());
    assert!(config.mine.is_empty());
}

#[test]
fn test_overrides_beat_defaults() {
    let user = overrides("salt_install: pip\nsalt_version: 2017.7.0\ndry_run: true\n");
    let config = resolve(&default_layer(), &user, &computed()).unwrap();

    assert_eq!(config.install_method(), InstallMethod::Pip);
    assert_eq!(config.version().as_str(), "2017.7.0");
    assert!(config.dry_run);
}

#[test]
fn test_computed_beats_overrides() {
    let user = overrides("os: windows\nsalt_version: 2016.11.0\n");
    let mut run = computed();
    run.set("salt_version", "latest");

    let config = resolve(&default_layer(), &user, &run).unwrap();

    assert_eq!(config.os(), OsFamily::Posix);
    assert_eq!(*config.version(), SaltVersion::Latest);
}

#[test]
fn test_merge_is_shallow() {
    let user = overrides("salt_minion_extra_config:\n  master: salt.example.com\n");
    let mut run = computed();
    run.set_assignment("salt_minion_extra_config={log_level: debug}")
        .unwrap();

    let config = resolve(&default_layer(), &user, &run).unwrap();
    let extra = config.minion_extra_config();

    assert_eq!(extra.len(), 1);
    assert_eq!(extra.get("log_level"), Some(&Value::from("debug")));
}

#[test]
fn test_unknown_key_rejected() {
    let user = overrides("salt_instal: pip\n");
    let err = resolve(&default_layer(), &user, &computed()).unwrap_err();

    assert!(matches!(err, SaltError::ConfigUnknownKey { ref key } if key == "salt_instal"));
}

#[test]
fn test_missing_sandbox_path() {
    let mut run = ConfigLayer::new();
    run.set("os", "posix");
    let err = resolve(&default_layer(), &ConfigLayer::new(), &run).unwrap_err();

    assert!(matches!(err, SaltError::ConfigMissingKey { ref key } if key == "sandbox_path"));
}

#[test]
fn test_missing_os() {
    let mut run = ConfigLayer::new();
    run.set("sandbox_path", "/tmp/sandbox");
    let err = resolve(&default_layer(), &ConfigLayer::new(), &run).unwrap_err();

    assert!(matches!(err, SaltError::ConfigMissingKey { ref key } if key == "os"));
}

#[test]
fn test_null_required_value_is_missing() {
    let user = overrides("salt_version: ~\n");
    let err = resolve(&default_layer(), &user, &computed()).unwrap_err();

    assert!(matches!(err, SaltError::ConfigMissingKey { ref key } if key == "salt_version"));
}

#[test]
fn test_empty_defaults_require_every_key() {
    let err = resolve(&ConfigLayer::new(), &ConfigLayer::new(), &computed()).unwrap_err();
    assert!(matches!(err, SaltError::ConfigMissingKey { .. }));
}

#[test]
fn test_invalid_install_method() {
    let user = overrides("salt_install: apt\n");
    let err = resolve(&default_layer(), &user, &computed()).unwrap_err();

    assert!(matches!(err, SaltError::ConfigInvalid { .. }));
}

#[test]
fn test_null_grains_stay_absent() {
    let user = overrides("grains: ~\n");
    let config = resolve(&default_layer(), &user, &computed()).unwrap();
    assert!(config.grains().is_none());
}

#[test]
fn test_grains_mapping() {
    let user = overrides("grains:\n  role: web\n");
    let config = resolve(&default_layer(), &user, &computed()).unwrap();
    let grains = config.grains().unwrap();
    assert_eq!(grains.get("role"), Some(&Value::from("web")));
}

#[test]
fn test_extra_config_keys_stringified() {
    let user = overrides("salt_minion_extra_config:\n  1: one\n  true: yes\n");
    let config = resolve(&default_layer(), &user, &computed()).unwrap();
    let extra = config.minion_extra_config();

    assert!(extra.contains_key("1"));
    assert!(extra.contains_key("true"));
}

#[test]
fn test_hyphenated_mine_keys() {
    let user = overrides(
        "mine-from-files: [a.yaml, b.yaml]\nexternal-mine:\n  web: files/web.yaml\nmock-mine: mock.yaml\n",
    );
    let config = resolve(&default_layer(), &user, &computed()).unwrap();

    assert_eq!(
        config.mine_from_files,
        vec![PathBuf::from("a.yaml"), PathBuf::from("b.yaml")]
    );
    assert_eq!(
        config.external_mine.get("web"),
        Some(&PathBuf::from("files/web.yaml"))
    );
    assert_eq!(config.mock_mine, Some(PathBuf::from("mock.yaml")));
}

#[test]
fn test_spm_repos_filtered() {
    let user = overrides(
        "vendor_repo:\n  - type: apt\n    url: http://apt.example.com\n  - type: spm\n    url: http://spm.example.com\n",
    );
    let config = resolve(&default_layer(), &user, &computed()).unwrap();
    let urls: Vec<&str> = config.spm_repos().map(|r| r.url.as_str()).collect();

    assert_eq!(urls, vec!["http://spm.example.com"]);
}

#[test]
fn test_to_yaml_roundtrip() {
    let config = resolve(&default_layer(), &ConfigLayer::new(), &computed()).unwrap();
    let yaml = config.to_yaml().unwrap();
    let reparsed: SaltConfig = serde_yaml::from_str(&yaml).unwrap();

    assert_eq!(config, reparsed);
}

#[test]
fn test_every_required_key_has_default_or_is_computed() {
    let defaults = default_layer();
    for entry in KEYS.iter().filter(|entry| entry.required) {
        assert!(
            defaults.contains(entry.name) || ["sandbox_path", "os"].contains(&entry.name),
            "required key '{}' has no default",
            entry.name
        );
    }
}

#[test]
fn test_null_mine_is_empty() {
    let user = overrides("mine: ~\nstate_top: ~\npillars: ~\n");
    let config = resolve(&default_layer(), &user, &computed()).unwrap();

    assert!(config.mine.is_empty());
    assert!(config.state_top.is_empty());
    assert!(config.pillars.is_empty());
}

#[test]
fn test_float_version_rejected() {
    let user = overrides("salt_version: 2019.20\n");
    let err = resolve(&default_layer(), &user, &computed()).unwrap_err();

    assert!(matches!(err, SaltError::ConfigInvalid { ref message } if message.contains("quote it")));
}

#[test]
fn test_remote_path_under_root() {
    let config = resolve(&default_layer(), &ConfigLayer::new(), &computed()).unwrap();
    assert_eq!(config.remote_path("/srv/salt"), "/tmp/kitchen/srv/salt");

    let mut run = computed();
    run.set("os", "windows").set("root_path", "C:\\kitchen\\");
    let config = resolve(&default_layer(), &ConfigLayer::new(), &run).unwrap();
    assert_eq!(config.remote_path("/srv/salt"), "C:\\kitchen\\srv\\salt");
}
