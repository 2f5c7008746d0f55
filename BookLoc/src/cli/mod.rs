//! BookLoc CLI - Command-line interface for the localization workflow

pub mod commands;
pub mod progress;

use clap::Parser;
use commands::{Commands, GlobalArgs};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bookloc")]
#[command(about = "BookLoc: extract, map and package dialogue for translation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Run the BookLoc CLI
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let default_level = if cli.global.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let ctx = cli.global.context()?;
    cli.command.execute(&ctx)?;

    Ok(())
}
