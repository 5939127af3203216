//! Phototag - HTTP service that turns uploaded photos into semantic tags.
//!
//! Clients POST raw image bytes and get back a short list of tags, either
//! from a fixed-vocabulary classifier or from zero-shot scoring against a
//! curated set of category phrases.
//!
//! # Usage
//!
//! ```bash
//! # Serve on the configured address (default 0.0.0.0:5000)
//! phototag serve
//!
//! # Tag a photo
//! curl --data-binary @photo.jpg http://localhost:5000/predict
//!
//! # View configuration
//! phototag config show
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use phototag_core::Config;

mod cli;
mod logging;
mod server;

/// Phototag - HTTP service that turns uploaded photos into semantic tags.
#[derive(Parser, Debug)]
#[command(name = "phototag")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(short, long, global = true, env = "PHOTOTAG_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Load the model and serve the tagging API
    Serve(cli::serve::ServeArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config problems go to stderr directly.
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `phototag config path`."
            );
            Config::default()
        }
    };
    logging::init_from_config(&config.logging, cli.verbose, cli.json_logs);

    tracing::debug!("Phototag v{}", phototag_core::VERSION);

    match cli.command {
        Commands::Serve(args) => cli::serve::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, cli.config.as_deref()).await,
    }
}
