use std::{
    fs,
    path::{Path, PathBuf},
};

use geojson::FeatureCollection;
use rayon::prelude::*;
use roadnet_core::prelude::*;
use serde_json::{Map, json};
use tracing::{info, warn};

use crate::{BatchConfig, BatchError, Coordinate};

/// What one mode's run produced
#[derive(Debug, Clone, PartialEq)]
pub struct ModeReport {
    pub mode: Mode,
    pub origin: NodeId,
    pub destination: NodeId,
    /// `None` when the destination is unreachable
    pub distance_route: Option<RoutePath>,
    pub time_route: Option<RoutePath>,
    pub outputs: Vec<PathBuf>,
}

/// Runs every mode in `modes` independently, in parallel.
///
/// A mode whose graph has no nodes to snap to is skipped and produces no
/// report; unreachable destinations are logged and leave the route empty.
///
/// # Errors
///
/// Configuration, graph loading and output I/O failures abort the run.
pub fn run(config: &BatchConfig, modes: &[Mode]) -> Result<Vec<ModeReport>, BatchError> {
    let table = config.speed_table()?;
    fs::create_dir_all(&config.output_dir).map_err(|source| BatchError::WriteOutput {
        path: config.output_dir.clone(),
        source,
    })?;

    let reports = modes
        .par_iter()
        .map(|&mode| run_mode(config, mode, &table))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(reports.into_iter().flatten().collect())
}

fn run_mode(
    config: &BatchConfig,
    mode: Mode,
    table: &SpeedTable,
) -> Result<Option<ModeReport>, BatchError> {
    let path = config
        .graph_path(mode)
        .ok_or(BatchError::MissingGraph(mode))?;
    let mut graph = load_road_graph(path)?;
    info!(
        %mode,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Graph loaded"
    );

    let (origin, destination) = match snap(&graph, config.origin, config.destination) {
        Ok(pair) => pair,
        Err(e) => {
            warn!(%mode, "Skipping mode, nearest node lookup failed: {e}");
            return Ok(None);
        }
    };

    let mut report = ModeReport {
        mode,
        origin,
        destination,
        distance_route: None,
        time_route: None,
        outputs: Vec::new(),
    };

    if let Some(route) = route_or_log(&graph, mode, origin, destination, &Weight::Length)? {
        info!(%mode, "distance≈{:.1}m", route.total_cost);
        let path = output_path(&config.output_dir, mode, "distance");
        write_route(&graph, &route, mode, "distance", &path)?;
        report.outputs.push(path);
        report.distance_route = Some(route);
    }

    annotate(&mut graph, mode, table);

    let weight = Weight::TravelTime(mode);
    if let Some(route) = route_or_log(&graph, mode, origin, destination, &weight)? {
        info!(
            %mode,
            "time≈{:.1}s ({:.1}min)",
            route.total_cost,
            route.total_cost / 60.0
        );
        let path = output_path(&config.output_dir, mode, "time");
        write_route(&graph, &route, mode, "time", &path)?;
        report.outputs.push(path);
        report.time_route = Some(route);
    }

    Ok(Some(report))
}

fn snap(
    graph: &RoadGraph,
    origin: Coordinate,
    destination: Coordinate,
) -> Result<(NodeId, NodeId), Error> {
    let (origin_node, origin_m) = nearest_node_with_distance(graph, origin.lat, origin.lon)?;
    let (destination_node, destination_m) =
        nearest_node_with_distance(graph, destination.lat, destination.lon)?;
    info!(
        origin = origin_node,
        destination = destination_node,
        "Snapped endpoints ({origin_m:.1}m, {destination_m:.1}m away)"
    );
    Ok((origin_node, destination_node))
}

fn route_or_log(
    graph: &RoadGraph,
    mode: Mode,
    origin: NodeId,
    destination: NodeId,
    weight: &Weight,
) -> Result<Option<RoutePath>, BatchError> {
    match shortest_path(graph, origin, destination, weight) {
        Ok(route) => Ok(Some(route)),
        Err(e) if e.is_recoverable() => {
            warn!(%mode, %weight, "{e}");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn output_path(dir: &Path, mode: Mode, weight: &str) -> PathBuf {
    dir.join(format!("{mode}_route_{weight}.geojson"))
}

fn write_route(
    graph: &RoadGraph,
    route: &RoutePath,
    mode: Mode,
    weight: &str,
    path: &Path,
) -> Result<(), BatchError> {
    let mut properties = Map::new();
    properties.insert("mode".to_string(), json!(mode));
    properties.insert("weight".to_string(), json!(weight));

    let feature = route.to_geojson(graph, properties)?;
    let collection: FeatureCollection = std::iter::once(feature).collect();
    let text = serde_json::to_string_pretty(&collection)?;

    fs::write(path, text).map_err(|source| BatchError::WriteOutput {
        path: path.to_path_buf(),
        source,
    })?;
    info!(%mode, "Wrote {}", path.display());
    Ok(())
}
