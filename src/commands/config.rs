//! Config command: print the resolved configuration or the defaults

use std::path::PathBuf;

use console::Style;
use serde_yaml::Value;

use super::helpers::{resolve_config, target_os};
use crate::cli::ConfigArgs;
use crate::config::{KEYS, default_layer_for};
use crate::error::Result;

/// Stand-in sandbox location; the config command never writes one
const UNSET_SANDBOX: &str = "<temporary>";

pub fn run(args: ConfigArgs) -> Result<()> {
    if args.defaults {
        return print_defaults(&args);
    }

    let config = resolve_config(&args.resolve, &PathBuf::from(UNSET_SANDBOX))?;
    print!("{}", config.to_yaml()?);
    Ok(())
}

fn print_defaults(args: &ConfigArgs) -> Result<()> {
    let layer = default_layer_for(target_os(&args.resolve)?);
    let dim = Style::new().dim();

    for spec in KEYS {
        match layer.get(spec.name) {
            Some(value) => {
                let mut entry = serde_yaml::Mapping::new();
                entry.insert(Value::from(spec.name), value.clone());
                print!("{}", serde_yaml::to_string(&entry)?);
            }
            None if spec.required => {
                println!("{}", dim.apply_to(format!("# {}: (set by the command line)", spec.name)));
            }
            None => println!("{}", dim.apply_to(format!("# {}: (unset)", spec.name))),
        }
    }
    Ok(())
}
