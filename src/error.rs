use std::{io, path::PathBuf};

use roadnet_core::Mode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Failed to read config '{path}': {source}")]
    ReadConfig { path: PathBuf, source: io::Error },
    #[error("Invalid config: {0}")]
    ParseConfig(#[from] toml::de::Error),
    #[error("No graph configured for mode {0}")]
    MissingGraph(Mode),
    #[error("Coordinate {name} ({lat}, {lon}) is out of range")]
    InvalidCoordinate { name: &'static str, lat: f64, lon: f64 },
    #[error("Failed to write '{path}': {source}")]
    WriteOutput { path: PathBuf, source: io::Error },
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Core(#[from] roadnet_core::Error),
}
