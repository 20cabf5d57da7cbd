//! Command-line interface definitions.

use crate::core::Environment;
use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Static asset host for single-page applications
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: spa-host.toml)
    #[arg(short = 'C', long, global = true, default_value = "spa-host.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the configured single-page apps over HTTP
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        host_args: HostArgs,

        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Resolve every mount, print its content roots and exit
    #[command(visible_alias = "c")]
    Check {
        #[command(flatten)]
        host_args: HostArgs,
    },
}

/// Shared host arguments for Serve and Check commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct HostArgs {
    /// Hosting environment (the manifest is only read in development)
    #[arg(short, long, value_enum)]
    pub environment: Option<Environment>,

    /// Static web assets manifest, overrides the conventional location
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub manifest: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl Cli {
    pub fn host_args(&self) -> &HostArgs {
        match &self.command {
            Commands::Serve { host_args, .. } | Commands::Check { host_args } => host_args,
        }
    }
}
