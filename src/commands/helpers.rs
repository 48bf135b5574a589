//! Shared helpers for commands that resolve a configuration

use std::path::Path;

use console::Style;
use tracing::debug;

use crate::cli::ResolveArgs;
use crate::common::paths::expand_home;
use crate::config::{ConfigLayer, OsFamily, SaltConfig, default_layer_for, resolve};
use crate::error::{Result, config};
use crate::operations::ProvisionOutput;

pub fn target_os(args: &ResolveArgs) -> Result<OsFamily> {
    match args.os.as_str() {
        "posix" => Ok(OsFamily::Posix),
        "windows" => Ok(OsFamily::Windows),
        other => Err(config::invalid(format!("unknown target OS '{other}'"))),
    }
}

/// Resolve the effective configuration for a run
///
/// `--set` assignments are applied first; the sandbox location and target OS
/// always come from the command line.
pub fn resolve_config(args: &ResolveArgs, sandbox_path: &Path) -> Result<SaltConfig> {
    let os = target_os(args)?;

    let overrides = match &args.config {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            ConfigLayer::from_yaml_file(&expand_home(path))?
        }
        None => ConfigLayer::new(),
    };

    let mut computed = ConfigLayer::new();
    for assignment in &args.set {
        computed.set_assignment(assignment)?;
    }
    computed
        .set("sandbox_path", sandbox_path.display().to_string())
        .set("os", os.to_string());

    resolve(&default_layer_for(os), &overrides, &computed)
}

/// Print each synthesized command under a heading
pub fn print_commands(output: &ProvisionOutput) {
    let heading = Style::new().bold().green();
    let steps = [
        ("Install command", output.install_command.as_deref()),
        ("Prepare command", output.prepare_command.as_deref()),
        ("Init command", Some(output.init_command.as_str())),
        ("Run command", Some(output.run_command.as_str())),
    ];

    for (label, command) in steps {
        let Some(command) = command else {
            continue;
        };
        println!("{}", heading.apply_to(format!("{label}:")));
        println!("{}", command.trim_end());
        println!();
    }
}
