//! saltsolo - masterless Salt sandbox builder
//!
//! Resolves a layered salt-call configuration, materializes the sandbox that
//! is uploaded to the target host, and synthesizes the install and highstate
//! commands for POSIX and Windows targets.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod command;
mod commands;
mod common;
mod config;
mod error;
mod mine;
mod operations;
mod sandbox;
mod temp;
mod template;

use cli::{Cli, Commands};

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("saltsolo={level}")));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Sandbox(args) => commands::sandbox::run(args),
        Commands::Commands(args) => commands::steps::run(args),
        Commands::Config(args) => commands::config::run(args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        tracing::debug!(category = %e.category(), "run failed");
        eprintln!("{:?}", miette::Report::new(e));
        std::process::exit(1);
    }
}
