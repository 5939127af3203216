//! The `phototag serve` command.

use clap::Args;
use phototag_core::Config;

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Interface to bind (overrides `server.host`)
    #[arg(long, env = "PHOTOTAG_HOST")]
    pub host: Option<String>,

    /// Port to bind (overrides `server.port`)
    #[arg(short, long, env = "PHOTOTAG_PORT")]
    pub port: Option<u16>,
}

/// Execute the serve command.
pub async fn execute(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        anyhow::ensure!(port > 0, "port must be greater than 0");
        config.server.port = port;
    }

    crate::server::serve(&config).await
}
