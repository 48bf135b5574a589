//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// saltsolo - masterless Salt sandbox builder
///
/// Resolve a salt-call configuration, write the sandbox that gets uploaded
/// to the target host, and print the commands that install salt and apply
/// the highstate there.
#[derive(Parser, Debug)]
#[command(
    name = "saltsolo",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Masterless Salt sandbox builder and command synthesizer",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  saltsolo sandbox --config salt.yml --sandbox ./sandbox\n    \
                  saltsolo commands --config salt.yml --os windows\n    \
                  saltsolo config --config salt.yml --set salt_version=2017.7.0\n    \
                  saltsolo config --defaults"
)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the sandbox tree and print the commands to run against it
    Sandbox(SandboxArgs),

    /// Print the install, prepare, init and run commands only
    Commands(CommandsArgs),

    /// Print the resolved configuration as YAML
    Config(ConfigArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Inputs shared by every command that resolves a configuration
#[derive(Args, Debug, Clone, Default)]
pub struct ResolveArgs {
    /// YAML file with option overrides
    #[arg(long, short = 'c', value_name = "FILE", env = "SALTSOLO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Target host dialect
    #[arg(long, value_name = "OS", value_parser = ["posix", "windows"], default_value = "posix")]
    pub os: String,

    /// Set an option, taking precedence over the config file (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,
}

/// Arguments for the sandbox command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Build into a fresh temporary directory:\n    saltsolo sandbox --config salt.yml\n\n\
                   Build into a given directory:\n    saltsolo sandbox --config salt.yml --sandbox ./sandbox\n\n\
                   Dry run with a pinned version:\n    saltsolo sandbox -c salt.yml --set dry_run=true --set salt_version=2016.11.3")]
pub struct SandboxArgs {
    #[command(flatten)]
    pub resolve: ResolveArgs,

    /// Sandbox directory (defaults to a new temporary directory)
    #[arg(long, short = 's', value_name = "DIR")]
    pub sandbox: Option<PathBuf>,

    /// List every file written to the sandbox
    #[arg(long)]
    pub list: bool,
}

/// Arguments for the commands command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Show commands for a Windows host:\n    saltsolo commands --config salt.yml --os windows\n\n\
                   Print only the run command:\n    saltsolo commands --config salt.yml --only run")]
pub struct CommandsArgs {
    #[command(flatten)]
    pub resolve: ResolveArgs,

    /// Print a single command without headings
    #[arg(long, value_name = "STEP", value_parser = ["install", "prepare", "init", "run"])]
    pub only: Option<String>,
}

/// Arguments for the config command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Show the effective configuration:\n    saltsolo config --config salt.yml\n\n\
                   List every option with its default:\n    saltsolo config --defaults")]
pub struct ConfigArgs {
    #[command(flatten)]
    pub resolve: ResolveArgs,

    /// Print the default for every option instead of resolving
    #[arg(long)]
    pub defaults: bool,
}

/// Arguments for the completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Bash:\n    saltsolo completions --shell bash > ~/.local/share/bash-completion/completions/saltsolo\n\n\
                   Zsh:\n    saltsolo completions --shell zsh > ~/.zfunc/_saltsolo")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}
