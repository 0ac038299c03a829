use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use roadnet::{BatchConfig, BatchError};
use roadnet_core::Mode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Route between two coordinates on prebuilt road graphs", long_about = None)]
struct Cli {
    /// Path to the TOML run configuration
    #[arg(short, long, default_value = "roadnet.toml")]
    config: PathBuf,
    /// Restrict the run to these modes (repeatable)
    #[arg(short, long = "mode")]
    modes: Vec<Mode>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), BatchError> {
    let config = BatchConfig::from_file(&cli.config)?;
    let modes = if cli.modes.is_empty() {
        config.modes.clone()
    } else {
        cli.modes.clone()
    };
    for mode in &modes {
        if config.graph_path(*mode).is_none() {
            return Err(BatchError::MissingGraph(*mode));
        }
    }

    let reports = roadnet::run(&config, &modes)?;
    info!(
        "Done: {} of {} modes routed, output in {}",
        reports.len(),
        modes.len(),
        config.output_dir.display()
    );
    Ok(())
}
