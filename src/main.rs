//! spa-host - serves single-page apps from composed, precompressed asset roots.

#![allow(dead_code)]

mod cli;
mod config;
mod core;
mod encoding;
mod logger;
mod manifest;
mod mount;
mod namespace;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{AppConfig, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    init_config(AppConfig::load(cli)?);

    match &cli.command {
        Commands::Serve { .. } => cli::serve::serve_site(),
        Commands::Check { .. } => cli::check::check_site(),
    }
}
