//! WaveShaper CLI
//!
//! Command-line driver for the WaveShaper spectral engine.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use waveshaper::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    info!("WaveShaper v{}", env!("CARGO_PKG_VERSION"));

    let config = commands::load_config(cli.config.as_deref()).context("loading engine config")?;

    match cli.command {
        Some(Commands::Process(args)) => {
            commands::process(config, &args).context("processing tone")
        }
        Some(Commands::PrintConfig) => {
            commands::print_config(&config).context("printing config")
        }
        None => {
            println!("WaveShaper v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}
