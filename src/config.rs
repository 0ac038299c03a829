//! TOML configuration of a batch run

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use roadnet_core::prelude::*;
use serde::Deserialize;

use crate::BatchError;

/// A WGS84 coordinate
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchConfig {
    /// Directory receiving the GeoJSON routes
    pub output_dir: PathBuf,
    #[serde(default = "all_modes")]
    pub modes: Vec<Mode>,
    pub origin: Coordinate,
    pub destination: Coordinate,
    /// Node-link graph file per mode name
    #[serde(default)]
    pub graphs: BTreeMap<String, PathBuf>,
    /// Road-class speed overrides per mode name
    #[serde(default)]
    pub speeds: BTreeMap<String, ModeSpeedsOverride>,
}

fn all_modes() -> Vec<Mode> {
    Mode::ALL.to_vec()
}

impl BatchConfig {
    /// Reads and validates a config file. Relative graph and output paths
    /// are resolved against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, BatchError> {
        let text = fs::read_to_string(path).map_err(|source| BatchError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&text)?;

        if let Some(base) = path.parent() {
            config.output_dir = base.join(&config.output_dir);
            for graph in config.graphs.values_mut() {
                *graph = base.join(&*graph);
            }
        }
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, BatchError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), BatchError> {
        for key in self.graphs.keys().chain(self.speeds.keys()) {
            key.parse::<Mode>()?;
        }
        for mode in &self.modes {
            if self.graph_path(*mode).is_none() {
                return Err(BatchError::MissingGraph(*mode));
            }
        }
        for (name, point) in [("origin", self.origin), ("destination", self.destination)] {
            if !(-90.0..=90.0).contains(&point.lat) || !(-180.0..=180.0).contains(&point.lon) {
                return Err(BatchError::InvalidCoordinate {
                    name,
                    lat: point.lat,
                    lon: point.lon,
                });
            }
        }
        Ok(())
    }

    pub fn graph_path(&self, mode: Mode) -> Option<&Path> {
        self.graphs.get(mode.as_str()).map(PathBuf::as_path)
    }

    /// Reference speed table with this config's overrides applied
    pub fn speed_table(&self) -> Result<SpeedTable, BatchError> {
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

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
        output_dir = "out"
        modes = ["drive", "walk"]

        [origin]
        lat = 37.5658
        lon = 126.9386

        [destination]
        lat = 37.5796
        lon = 126.9770

        [graphs]
        drive = "graphs/drive.json"
        walk = "graphs/walk.json"

        [speeds.walk]
        fallback_kph = 5.0
        classes = { steps = 2.0 }
    "#;

    #[test]
    fn parses_config() {
        let config = BatchConfig::from_toml(CONFIG).unwrap();
        assert_eq!(config.modes, vec![Mode::Drive, Mode::Walk]);
        assert_eq!(config.origin.lat, 37.5658);
        assert_eq!(config.graph_path(Mode::Walk), Some(Path::new("graphs/walk.json")));
        assert_eq!(config.graph_path(Mode::Bike), None);

        let table = config.speed_table().unwrap();
        assert_eq!(table.fallback(Mode::Walk), 5.0);
        assert_eq!(table.class_speed(Mode::Walk, "steps"), Some(2.0));
        assert_eq!(table.class_speed(Mode::Walk, "footway"), Some(4.5));
        assert_eq!(table.fallback(Mode::Drive), 40.0);
    }

    #[test]
    fn every_mode_needs_a_graph() {
        let text = CONFIG.replace("modes = [\"drive\", \"walk\"]", "modes = [\"bike\"]");
        assert!(matches!(
            BatchConfig::from_toml(&text),
            Err(BatchError::MissingGraph(Mode::Bike))
        ));
    }

    #[test]
    fn unknown_mode_key_is_rejected() {
        let text = CONFIG.replace("[speeds.walk]", "[speeds.tram]");
        assert!(matches!(
            BatchConfig::from_toml(&text),
            Err(BatchError::Core(Error::InvalidData(_)))
        ));
    }

    #[test]
    fn out_of_range_coordinate_is_rejected() {
        let text = CONFIG.replace("lat = 37.5796", "lat = 137.5796");
        assert!(matches!(
            BatchConfig::from_toml(&text),
            Err(BatchError::InvalidCoordinate {
                name: "destination",
                ..
            })
        ));
    }

    #[test]
    fn relative_paths_follow_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        fs::write(&path, CONFIG).unwrap();

        let config = BatchConfig::from_file(&path).unwrap();
        assert_eq!(config.output_dir, dir.path().join("out"));
        assert_eq!(
            config.graph_path(Mode::Drive),
            Some(dir.path().join("graphs/drive.json").as_path())
        );
    }
}
