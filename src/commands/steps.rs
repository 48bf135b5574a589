//! Commands command: print the synthesized commands only
//!
//! The sandbox is still built, in a scratch directory that is removed
//! afterwards, so every source the commands depend on is validated.

use super::helpers::{print_commands, resolve_config};
use crate::cli::CommandsArgs;
use crate::error::Result;
use crate::operations::Provisioner;
use crate::temp;
use crate::template::PlaceholderRenderer;

pub fn run(args: CommandsArgs) -> Result<()> {
    let scratch = temp::scratch_sandbox()?;
    let config = resolve_config(&args.resolve, scratch.path())?;
    let output = Provisioner::new(&config, &PlaceholderRenderer).provision()?;

    let Some(step) = args.only.as_deref() else {
        print_commands(&output);
        return Ok(());
    };

    let command = match step {
        "install" => output.install_command.as_deref(),
        "prepare" => output.prepare_command.as_deref(),
        "init" => Some(output.init_command.as_str()),
        _ => Some(output.run_command.as_str()),
    };
    if let Some(command) = command {
        println!("{}", command.trim_end());
    }

    Ok(())
}
