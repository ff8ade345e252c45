//! Serve command - run the HTTP API.

use std::path::{Path, PathBuf};

use clap::Args;

use super::load_config;

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Bind address (overrides server.host)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides server.port)
    #[arg(short, long)]
    port: Option<u16>,

    /// Upload directory (overrides upload.dir)
    #[arg(long)]
    upload_dir: Option<PathBuf>,
}

pub async fn run(args: ServeArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(dir) = args.upload_dir {
        config.upload.dir = dir;
    }

    licita_server::start_server(config).await
}
