//! iconpack - Browse, select and export icons from a design-tool component set.

mod catalog;
mod cli;
mod client;
mod config;
mod core;
mod figma;
mod logger;
mod svg;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::AppConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = AppConfig::load(&cli)?;

    match &cli.command {
        Commands::Serve { .. } => cli::serve::serve(&config),
        Commands::Resolve { pretty } => cli::resolve::run_resolve(&config, *pretty),
        Commands::List { preview, .. } => cli::list::run_list(&config, *preview),
        Commands::Export { select, all, .. } => cli::export::run_export(&config, select, *all),
        Commands::Browse { .. } => cli::browse::run_browse(&config),
    }
}
