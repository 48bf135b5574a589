//! State top file and pillars

use std::path::Path;

use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

use crate::common::paths::{is_contained, remote_join, resolve_local, sandbox_relative};
use crate::config::SaltConfig;
use crate::error::{Result, config as config_error, data_source};
use crate::mine;

use super::SandboxWriter;

const TOP_FILE: &str = "top.sls";
const SLS_EXTENSION: &str = ".sls";

/// Write `pillars` and copy `pillars-from-files` below `salt_pillar_root`
///
/// Without a user `top.sls` one is generated that assigns every pillar to
/// all minions in `salt_env`.
pub(super) fn prepare_pillars(writer: &mut SandboxWriter, config: &SaltConfig) -> Result<()> {
    if config.pillars.is_empty() && config.pillars_from_files.is_empty() {
        return Ok(());
    }
    info!("Preparing pillars into {}", config.salt_pillar_root);

    let mut names = Vec::new();
    for (key, value) in &config.pillars {
        let name = mine::entry_name(key);
        let target = pillar_target(config, &name)?;
        debug!("  ...{name}");
        writer.write_remote(&target, mine::to_yaml(value)?)?;
        names.push(name);
    }

    for (name, source) in &config.pillars_from_files {
        let target = pillar_target(config, name)?;
        let resolved = resolve_local(source);
        if !resolved.is_file() {
            return Err(data_source::not_found(source.display().to_string()));
        }
        debug!("  ...{name} (from {})", source.display());
        writer.copy(sandbox_relative(&target), &resolved)?;
        names.push(name.clone());
    }

    if names.iter().any(|name| name == TOP_FILE) {
        return Ok(());
    }
    let top = pillar_top(&config.salt_env, &names);
    writer.write_remote(
        &remote_join(&config.salt_pillar_root, TOP_FILE),
        mine::to_yaml(&top)?,
    )
}

/// Write `state_top` to `salt_state_top`, when one is configured
pub(super) fn prepare_state_top(writer: &mut SandboxWriter, config: &SaltConfig) -> Result<()> {
    if config.state_top.is_empty() {
        return Ok(());
    }
    info!("Preparing state top into {}", config.salt_state_top);
    writer.write_remote(&config.salt_state_top, mine::to_yaml(&config.state_top)?)
}

fn pillar_target(config: &SaltConfig, name: &str) -> Result<String> {
    if !is_contained(Path::new(name)) {
        return Err(config_error::invalid(format!(
            "pillar '{name}' must be a relative path below salt_pillar_root"
        )));
    }
    Ok(remote_join(&config.salt_pillar_root, name))
}

/// `{<env>: {'*': [<pillar>, ...]}}`, with `users.sls` named `users` and
/// `app/db.sls` named `app.db`
fn pillar_top(env: &str, names: &[String]) -> Mapping {
    let pillars: Vec<Value> = names
        .iter()
        .map(|name| {
            let stem = name.strip_suffix(SLS_EXTENSION).unwrap_or(name);
            Value::String(stem.replace(['/', '\\'], "."))
        })
        .collect();

    let mut targets = Mapping::new();
    targets.insert(Value::from("*"), Value::Sequence(pillars));
    let mut top = Mapping::new();
    top.insert(Value::from(env), Value::Mapping(targets));
    top
}
