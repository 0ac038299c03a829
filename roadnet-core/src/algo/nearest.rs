//! Snapping coordinates to the closest graph node.
//!
//! Nodes are indexed as points on the unit sphere. Straight-line (chord)
//! distance between two such points grows monotonically with great-circle
//! distance, so the R-tree ordering is the great-circle ordering for any
//! extent without choosing a projection.

use geo::{Distance, Haversine, Point};

use crate::{Error, NodeId, model::RoadGraph};

pub(crate) fn unit_sphere_point(lat: f64, lon: f64) -> [f64; 3] {
    let (lat, lon) = (lat.to_radians(), lon.to_radians());
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

/// Node closest to (`lat`, `lon`); ties go to the lowest node id.
///
/// # Errors
///
/// [`Error::EmptyGraph`] if the graph has no nodes,
/// [`Error::InvalidData`] if the query coordinate is not finite.
pub fn nearest_node(graph: &RoadGraph, lat: f64, lon: f64) -> Result<NodeId, Error> {
    nearest_node_with_distance(graph, lat, lon).map(|(id, _)| id)
}

/// Like [`nearest_node`], also returning the great-circle distance in meters.
///
/// # Errors
///
/// See [`nearest_node`].
pub fn nearest_node_with_distance(
    graph: &RoadGraph,
    lat: f64,
    lon: f64,
) -> Result<(NodeId, f64), Error> {
    if !(lat.is_finite() && lon.is_finite()) {
        return Err(Error::InvalidData(format!(
            "query coordinate ({lat}, {lon}) is not finite"
        )));
    }

    let query = unit_sphere_point(lat, lon);
    let mut candidates = graph.rtree().nearest_neighbor_iter_with_distance_2(&query);
    let (first, best_distance_2) = candidates.next().ok_or(Error::EmptyGraph)?;

    let mut best = graph.id_of(first.data);
    for (candidate, distance_2) in candidates {
        if distance_2 > best_distance_2 {
            break;
        }
        best = best.min(graph.id_of(candidate.data));
    }

    let node = graph.node(best).ok_or(Error::InvalidNodeReference(best))?;
    let meters = Haversine.distance(Point::new(lon, lat), node.geometry);
    log::debug!("Snapped ({lat}, {lon}) to node {best} at {meters:.1} m");

    Ok((best, meters))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> RoadGraph {
        let mut graph = RoadGraph::new();
        let mut id = 100;
        for row in 0..20 {
            for col in 0..20 {
                let lat = 37.50 + f64::from(row) * 0.004 + f64::from(col % 3) * 0.0001;
                let lon = 126.90 + f64::from(col) * 0.005 - f64::from(row % 4) * 0.0002;
                graph.add_node(id, lat, lon).unwrap();
                id += 1;
            }
        }
        graph
    }

    #[test]
    fn empty_graph_fails() {
        assert!(matches!(
            nearest_node(&RoadGraph::new(), 37.5, 126.9),
            Err(Error::EmptyGraph)
        ));
    }

    #[test]
    fn exact_coordinate_wins_over_very_close_node() {
        let mut graph = RoadGraph::new();
        graph.add_node(7, 37.565_780_0, 126.938_600_0).unwrap();
        graph.add_node(3, 37.565_780_1, 126.938_600_0).unwrap();
        graph.add_node(5, 37.565_779_9, 126.938_600_1).unwrap();

        let (id, meters) = nearest_node_with_distance(&graph, 37.565_780_0, 126.938_600_0).unwrap();
        assert_eq!(id, 7);
        assert_eq!(meters, 0.0);
    }

    #[test]
    fn ties_go_to_lowest_id() {
        let mut graph = RoadGraph::new();
        graph.add_node(42, 10.0, 20.0).unwrap();
        graph.add_node(17, 10.0, 20.0).unwrap();
        graph.add_node(99, 10.0, 20.0).unwrap();
        assert_eq!(nearest_node(&graph, 10.001, 20.001).unwrap(), 17);
    }

    #[test]
    fn agrees_with_brute_force_haversine() {
        let graph = grid();
        let queries = [
            (37.5123, 126.9312),
            (37.5561, 126.9789),
            (37.4900, 126.8800),
            (37.6000, 127.0100),
            (37.5333, 126.9444),
        ];

        for (lat, lon) in queries {
            let query = Point::new(lon, lat);
            let expected = graph
                .nodes()
                .map(|node| (Haversine.distance(query, node.geometry), node.id))
                .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
                .unwrap();

            let (id, meters) = nearest_node_with_distance(&graph, lat, lon).unwrap();
            assert!((meters - expected.0).abs() < 1e-6, "{meters} vs {}", expected.0);
            assert_eq!(id, expected.1);
        }
    }

    #[test]
    fn works_across_the_antimeridian() {
        let mut graph = RoadGraph::new();
        graph.add_node(1, 0.0, 179.99).unwrap();
        graph.add_node(2, 0.0, 179.0).unwrap();
        assert_eq!(nearest_node(&graph, 0.0, -179.99).unwrap(), 1);
    }
}
