//! ampcss - build a site stylesheet and an AMP-safe stylesheet from sass.

mod cli;
mod config;
mod core;
mod logger;
mod pipeline;
mod utils;
mod watch;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.build_args().verbose);

    let config = Config::load(&cli)?;

    match &cli.command {
        Commands::Build { .. } => cli::build::run_build(&config),
        Commands::Watch { .. } => cli::watch::run_watch(&config),
    }
}
