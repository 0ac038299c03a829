use std::{
    collections::BTreeMap,
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};

use roadnet_core::prelude::*;
use serde::Deserialize;

use crate::error::ServerError;

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

fn default_timeout() -> u64 {
    30
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
    /// Deadline for a single request, in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    pub graphs: BTreeMap<String, PathBuf>,
    #[serde(default)]
    pub speeds: BTreeMap<String, ModeSpeedsOverride>,
}

impl ServerConfig {
    pub fn from_file(path: &Path) -> Result<Self, ServerError> {
        let text = fs::read_to_string(path).map_err(|source| ServerError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&text)?;
        if let Some(base) = path.parent() {
            for graph in config.graphs.values_mut() {
                *graph = base.join(&*graph);
            }
        }
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Graph file per served mode
    pub fn graph_paths(&self) -> Result<Vec<(Mode, PathBuf)>, ServerError> {
        if self.graphs.is_empty() {
            return Err(ServerError::NoGraphs);
        }
        self.graphs
            .iter()
            .map(|(name, path)| Ok((name.parse::<Mode>()?, path.clone())))
            .collect()
    }

    pub fn speed_table(&self) -> Result<SpeedTable, ServerError> {
        let overrides = self
            .speeds
            .iter()
            .map(|(name, speeds)| Ok((name.parse::<Mode>()?, speeds)))
            .collect::<Result<Vec<_>, Error>>()?;

        let mut table = SpeedTable::default();
        table.apply_overrides(overrides)?;
        Ok(table)
    }
}
