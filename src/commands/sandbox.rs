//! Sandbox command: write the sandbox and print the commands to run

use std::fs;

use console::Style;
use tracing::info;

use super::helpers::{print_commands, resolve_config};
use crate::cli::SandboxArgs;
use crate::common::paths::expand_home;
use crate::error::{Result, sandbox};
use crate::operations::Provisioner;
use crate::sandbox::EntrySource;
use crate::temp;
use crate::template::PlaceholderRenderer;

pub fn run(args: SandboxArgs) -> Result<()> {
    let sandbox_path = match &args.sandbox {
        Some(dir) => {
            let dir = expand_home(dir);
            fs::create_dir_all(&dir).map_err(|e| sandbox::write_failed(&dir, e))?;
            dir
        }
        None => temp::persistent_sandbox()?,
    };
    info!("Writing sandbox into {}", sandbox_path.display());

    let config = resolve_config(&args.resolve, &sandbox_path)?;
    let output = Provisioner::new(&config, &PlaceholderRenderer).provision()?;

    let heading = Style::new().bold().green();
    println!(
        "{} {}",
        heading.apply_to("Sandbox:"),
        output.tree.root().display()
    );
    println!(
        "{} {} ({})",
        heading.apply_to("Salt:"),
        output.plan.install_reference(),
        output.plan.method
    );
    if args.list {
        let entries = output.tree.entries();
        for (path, entry) in output.tree.paths().iter().zip(entries) {
            match &entry.source {
                EntrySource::Written => println!("  {path}"),
                EntrySource::Copied(source) => {
                    let from = format!("<- {}", source.display());
                    println!("  {path} {}", Style::new().dim().apply_to(from));
                }
            }
        }
    }
    println!();
    print_commands(&output);

    Ok(())
}
