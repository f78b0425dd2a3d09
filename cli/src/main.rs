//! # researcher CLI
//!
//! Command-line interface for inspecting the deep research assistant's
//! configuration.
//!
//! ## Usage
//!
//! - `researcher` / `researcher show` - Print the resolved configuration
//! - `researcher check` - Validate the configuration
//! - `researcher schema` - Describe every configurable field
//!
//! Values come from environment variables first, then the options map
//! (`--options` file and `--set` flags), then the schema defaults.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod output;

use commands::{check_command, schema_command, show_command};
use config::CliConfigLoader;

/// researcher - configuration for a local deep research assistant
#[derive(Parser)]
#[command(name = "researcher")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect and validate deep research assistant configuration")]
#[command(long_about = None)]
struct Cli {
    /// JSON options file of the form {"configurable": {...}}
    #[arg(short, long, global = true)]
    options: Option<PathBuf>,

    /// Set an option (key=value); may be repeated, later values win
    #[arg(short, long = "set", value_name = "KEY=VALUE", global = true)]
    set: Vec<String>,

    /// Dotenv file to load (defaults to ./.env when present)
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved configuration and where each value came from
    Show {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Print API keys in full
        #[arg(long)]
        reveal: bool,
    },

    /// Validate the configuration and exit non-zero when it is invalid
    Check,

    /// Describe every configurable field
    Schema {
        /// Print a JSON Schema document
        #[arg(long)]
        json: bool,
    },
}

/// Build a configuration loader from CLI arguments
fn build_config_loader(cli: &Cli) -> CliConfigLoader {
    let mut loader = CliConfigLoader::new();

    if let Some(options_path) = &cli.options {
        loader = loader.with_options_file(options_path.clone());
    }

    for assignment in &cli.set {
        loader = loader.with_override(assignment.clone());
    }

    if let Some(env_file) = &cli.env_file {
        loader = loader.with_env_file(env_file.clone());
    }

    loader
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    researcher_core::init_tracing_with_debug(cli.verbose);

    // Build configuration loader
    let config_loader = build_config_loader(&cli);

    match cli.command {
        Some(Commands::Show { json, reveal }) => show_command(config_loader, json, reveal).await,
        Some(Commands::Check) => check_command(config_loader).await,
        Some(Commands::Schema { json }) => schema_command(json).await,
        // Default to showing the resolved configuration
        None => show_command(config_loader, false, false).await,
    }
}
