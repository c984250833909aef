//! storefront-monitor - performance monitoring and edge services for a storefront

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use storefront_monitor::server;
use storefront_monitor::utils::logging::init_tracing;
use storefront_monitor::{Config, Result};

/// Storefront performance monitor and edge server
#[derive(Debug, Parser)]
#[command(name = "storefront-monitor", version, about)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long, env = "STOREFRONT_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,
}

impl Cli {
    async fn load(&self) -> Result<Config> {
        let mut config = server::load_config(self.config.clone()).await?;

        if let Some(host) = &self.host {
            config.app.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.app.server.port = port;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match cli.load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(config.logging()) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match server::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
