//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Run the CLI application.
pub async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    // Create context for commands
    let ctx = commands::Context {
        ssh_config: config.ssh_config_path(cli.ssh_config)?,
        directory: config.directory_config(),
    };

    // Dispatch to appropriate command
    match cli.command {
        Commands::KnownHosts(args) => commands::known_hosts::execute(ctx, args).await,
        Commands::Configure(args) => commands::configure::execute(&ctx, &args),
    }
}

/// Send tracing output to stderr, honouring `RUST_LOG`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // Only fails if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
