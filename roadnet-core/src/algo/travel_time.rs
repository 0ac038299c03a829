//! Per-mode travel time annotation

use log::{debug, info};

use super::speed::{SpeedSource, resolve_speed_with_source};
use crate::model::{Mode, RoadGraph, SpeedTable};

/// Speeds are floored to this value (km/h) before division
pub const MIN_SPEED_KPH: f64 = 1e-6;
/// Smallest travel time an edge can carry, so zero-length edges still
/// have a strictly positive weight
pub const MIN_TRAVEL_TIME_S: f64 = 1e-6;

/// Seconds needed to cover `length_m` at `speed_kph`
pub fn travel_time_seconds(length_m: f64, speed_kph: f64) -> f64 {
    let speed = speed_kph.max(MIN_SPEED_KPH);
    ((length_m / 1000.0) / speed * 3600.0).clamp(MIN_TRAVEL_TIME_S, f64::MAX)
}

/// Computes the `mode` travel time of every edge and stores it in the
/// edge's `mode` slot. Other modes' travel times are left untouched.
///
/// Re-running with the same mode and table reproduces identical values.
pub fn annotate<'a>(graph: &'a mut RoadGraph, mode: Mode, table: &SpeedTable) -> &'a mut RoadGraph {
    let mut counts = [0usize; 3];

    for edge in graph.edges_mut() {
        let resolved = resolve_speed_with_source(edge, mode, table);
        let seconds = travel_time_seconds(edge.length_m, resolved.kph);
        edge.set_travel_time_s(mode, seconds);

        counts[match resolved.source {
            SpeedSource::Posted => 0,
            SpeedSource::RoadClass => 1,
            SpeedSource::Fallback => 2,
        }] += 1;
    }
    graph.mark_annotated(mode);

    info!(
        "Annotated {} edges with {mode} travel times",
        graph.edge_count()
    );
    debug!(
        "{mode} speed sources: {} posted, {} road class, {} fallback",
        counts[0], counts[1], counts[2]
    );

    graph
}
