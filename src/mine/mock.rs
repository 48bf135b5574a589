//! Mocked mine and remote functions for isolated highstate runs
//!
//! When a mock mine or mock remote-functions file is configured, the files
//! are staged under their own roots together with the `mock` state stubs
//! and the `_states/mock.py` module in the salt file root, so states can
//! call `mock.mine` instead of a master. `mock-state-module` replaces the
//! built-in module.

use std::path::Path;

use serde_yaml::Mapping;
use tracing::{debug, info};

use super::load_mapping;
use crate::common::paths::{basename, remote_join, resolve_local, sandbox_relative};
use crate::config::SaltConfig;
use crate::error::{Result, data_source};
use crate::sandbox::SandboxWriter;
use crate::template::builtin::{self, MOCK_STATES};
use crate::template::{TemplateContext, TemplateRenderer};

/// Location of the optional mock state module, relative to the file root
pub const MOCK_STATE_MODULE: &str = "_states/mock.py";

pub fn is_enabled(config: &SaltConfig) -> bool {
    config.mock_mine.is_some() || config.mock_remote_functions.is_some()
}

/// Stage mock data and state stubs
pub fn prepare(
    writer: &mut SandboxWriter,
    config: &SaltConfig,
    renderer: &dyn TemplateRenderer,
) -> Result<()> {
    if !is_enabled(config) {
        return Ok(());
    }
    info!("Preparing mock setup");

    for (name, content) in MOCK_STATES {
        writer.write_remote(&remote_join(&config.salt_file_root, name), content)?;
    }
    let module_target = remote_join(&config.salt_file_root, MOCK_STATE_MODULE);
    match &config.mock_state_module {
        Some(module) => copy_source(writer, module, &module_target)?,
        None => {
            let mut context = TemplateContext::new();
            context
                .insert("mine_dir", config.remote_path(&config.salt_mock_mine_root))
                .insert(
                    "remote_functions_dir",
                    config.remote_path(&config.salt_mock_remote_functions_root),
                );
            let module = renderer.render(&builtin::mock_module(), &context)?;
            writer.write_remote(&module_target, module)?;
        }
    }

    if let Some(data) = load_mock_mine(config)? {
        debug!("mock mine has {} entries", data.len());
    }
    if let Some(mine) = &config.mock_mine {
        info!("Preparing mine into {}", config.salt_mock_mine_root);
        let target = remote_join(&config.salt_mock_mine_root, &basename(mine));
        copy_source(writer, mine, &target)?;
    }

    if let Some(functions) = &config.mock_remote_functions {
        info!(
            "Preparing remote_functions into {}",
            config.salt_mock_remote_functions_root
        );
        let target = remote_join(&config.salt_mock_remote_functions_root, &basename(functions));
        copy_source(writer, functions, &target)?;
    }

    Ok(())
}

/// Parse the mock mine file, if one is configured
pub fn load_mock_mine(config: &SaltConfig) -> Result<Option<Mapping>> {
    let Some(path) = &config.mock_mine else {
        return Ok(None);
    };
    info!("Collecting mock mine data from {}", path.display());
    load_mapping(path).map(Some)
}

fn copy_source(writer: &mut SandboxWriter, source: &Path, remote: &str) -> Result<()> {
    let resolved = resolve_local(source);
    if !resolved.is_file() {
        return Err(data_source::not_found(source.display().to_string()));
    }
    debug!("  ...{}", source.display());
    writer.copy(sandbox_relative(remote), &resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigLayer, default_layer, resolve};
    use crate::error::SaltError;
    use crate::template::PlaceholderRenderer;
    use std::fs;
    use tempfile::TempDir;

    fn config_with(sandbox: &Path, yaml: &str) -> SaltConfig {
        let mut computed = ConfigLayer::new();
        computed
            .set("sandbox_path", sandbox.display().to_string())
            .set("os", "posix");
        let overrides = ConfigLayer::from_yaml_str(yaml).unwrap();
        resolve(&default_layer(), &overrides, &computed).unwrap()
    }

    #[test]
    fn test_disabled_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let config = config_with(temp.path(), "");
        let mut writer = SandboxWriter::new(temp.path());

        prepare(&mut writer, &config, &PlaceholderRenderer).unwrap();

        assert!(writer.finish().is_empty());
        assert_eq!(load_mock_mine(&config).unwrap(), None);
    }

    #[test]
    fn test_stages_mock_files() {
        let temp = TempDir::new().unwrap();
        let mine = temp.path().join("mock-mine.yaml");
        let functions = temp.path().join("functions.yaml");
        fs::write(&mine, "web01:\n  network.ip_addrs: [10.0.0.1]\n").unwrap();
        fs::write(&functions, "web01: {}\n").unwrap();
        let sandbox = temp.path().join("sandbox");
        let config = config_with(
            &sandbox,
            &format!(
                "mock-mine: {}\nmock-remote-functions: {}\nsalt_mock_mine_root: /srv/mock\n",
                mine.display(),
                functions.display()
            ),
        );
        let mut writer = SandboxWriter::new(&sandbox);

        prepare(&mut writer, &config, &PlaceholderRenderer).unwrap();
        let tree = writer.finish();

        assert_eq!(
            tree.paths(),
            vec![
                "srv/salt/mock/mine.sls",
                "srv/salt/mock/remote_functions.sls",
                "srv/salt/_states/mock.py",
                "srv/mock/mock-mine.yaml",
                "srv/remote_functions/functions.yaml",
            ]
        );

        let data = load_mock_mine(&config).unwrap().unwrap();
        assert!(data.contains_key("web01"));

        let module = fs::read_to_string(sandbox.join("srv/salt/_states/mock.py")).unwrap();
        assert!(module.contains("MINE_DIR = r'/tmp/kitchen/srv/mock'"));
        assert!(module.contains("REMOTE_FUNCTIONS_DIR = r'/tmp/kitchen/srv/remote_functions'"));
        assert!(module.contains("def mine(name):"));
    }

    #[test]
    fn test_state_module_copied() {
        let temp = TempDir::new().unwrap();
        let mine = temp.path().join("mine.yaml");
        let module = temp.path().join("mock.py");
        fs::write(&mine, "{}\n").unwrap();
        fs::write(&module, "def mine(name):\n    pass\n").unwrap();
        let sandbox = temp.path().join("sandbox");
        let config = config_with(
            &sandbox,
            &format!(
                "mock-mine: {}\nmock-state-module: {}\n",
                mine.display(),
                module.display()
            ),
        );
        let mut writer = SandboxWriter::new(&sandbox);

        prepare(&mut writer, &config, &PlaceholderRenderer).unwrap();

        assert!(writer.finish().contains("srv/salt/_states/mock.py"));
        assert_eq!(
            fs::read_to_string(sandbox.join("srv/salt/_states/mock.py")).unwrap(),
            "def mine(name):\n    pass\n"
        );
    }

    #[test]
    fn test_missing_mock_mine() {
        let temp = TempDir::new().unwrap();
        let config = config_with(temp.path(), "mock-mine: /nonexistent/mock.yaml\n");
        let mut writer = SandboxWriter::new(temp.path());

        let err = prepare(&mut writer, &config, &PlaceholderRenderer).unwrap_err();
        assert!(matches!(err, SaltError::DataSourceNotFound { .. }));
        assert!(matches!(
            load_mock_mine(&config).unwrap_err(),
            SaltError::DataSourceNotFound { .. }
        ));
    }
}
