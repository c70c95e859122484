mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::commands::chain::ChainKind;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    info!(
        "🚀 Scaffold++ CLI v{} starting up.",
        env!("CARGO_PKG_VERSION")
    );
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let progress = if cli.quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };

    let command_result = match &cli.command {
        Commands::Extract(args) => {
            info!("Dispatching to 'extract' command.");
            commands::extract::run(args)
        }
        Commands::Enumerate(args) => {
            info!("Dispatching to 'enumerate' command.");
            commands::chain::run(args, ChainKind::Enumerative)
        }
        Commands::Prioritize(args) => {
            info!("Dispatching to 'prioritize' command.");
            commands::chain::run(args, ChainKind::Prioritized)
        }
        Commands::Network(args) => {
            info!("Dispatching to 'network' command.");
            commands::network::run(args, &progress)
        }
        Commands::Tree(args) => {
            info!("Dispatching to 'tree' command.");
            commands::tree::run(args, &progress)
        }
    };

    match &command_result {
        Ok(_) => info!("✅ Command completed successfully."),
        Err(e) => error!("❌ Command failed: {}", e),
    }

    command_result
}
