//! HTTP routing service over prebuilt road graphs

mod api;
mod config;
mod error;

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::{api::AppState, config::ServerConfig, error::ServerError};

#[derive(Parser)]
#[command(author, version, about = "Serve shortest-path queries over road graphs", long_about = None)]
struct Cli {
    /// Path to the TOML server configuration
    #[arg(short, long, default_value = "roadnet-server.toml")]
    config: PathBuf,
    /// Overrides the configured listen address
    #[arg(short, long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let cli = Cli::parse();
    match serve(cli).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            std::process::ExitCode::FAILURE
        }
    }
}

async fn serve(cli: Cli) -> Result<(), ServerError> {
    let config = ServerConfig::from_file(&cli.config)?;
    let paths = config.graph_paths()?;
    let table = config.speed_table()?;

    let state = tokio::task::spawn_blocking(move || AppState::load(&paths, &table))
        .await
        .map_err(std::io::Error::other)??;
    let modes = state.modes();
    let app = api::router(Arc::new(state), config.request_timeout());

    let addr = cli.bind.unwrap_or(config.bind);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(?modes, "Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
