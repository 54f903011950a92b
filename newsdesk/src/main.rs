/*
newsdesk - main.rs
This binary loads the configuration, builds the enrichment pipeline and serves it over Rocket.
*/

use anyhow::Result;
use clap::Parser;
use common::Config;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use newsdesk::server::{launch_rocket, AppState};

#[derive(Parser, Debug)]
#[command(name = "newsdesk", about = "Indian news aggregation and analysis server")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    dotenv::dotenv().ok();

    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let default_path = PathBuf::from("config.default.toml");

    let override_path = if let Some(p) = args.config {
        if !p.exists() {
            error!(path = ?p, "specified config file not found");
            return Err(anyhow::anyhow!("Config file not found: {}", p.display()));
        }
        Some(p)
    } else {
        let p = PathBuf::from("config.toml");
        if p.exists() { Some(p) } else { None }
    };

    let mut config = match Config::load_with_defaults(
        if default_path.exists() { Some(&default_path) } else { None },
        override_path.as_deref(),
    )
    .await
    {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("failed to load configuration: {:#}", e);
            return Err(e);
        }
    };
    info!(default = ?default_path, override = ?override_path, "configuration loaded");

    // PORT from the environment wins over the file
    if let Ok(port) = std::env::var("PORT") {
        match port.parse::<u16>() {
            Ok(port) => config.server.port = port,
            Err(_) => warn!(value = %port, "ignoring invalid PORT"),
        }
    }

    let state = AppState::from_config(config).await?;

    info!("Launching Rocket HTTP server");
    if let Err(e) = launch_rocket(state).await {
        error!(%e, "Rocket server failed");
        return Err(e);
    }

    info!("Shutdown complete");
    Ok(())
}
