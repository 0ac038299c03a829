use geo::{Coord, LineString};
use itertools::Itertools;
use log::debug;

use super::{dijkstra::dijkstra, weight::Weight};
use crate::{
    Error, NodeId,
    model::{RoadEdge, RoadGraph},
};

/// Minimum-cost route between two nodes
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePath {
    /// Node ids from origin to destination
    pub nodes: Vec<NodeId>,
    /// Sum of the chosen weight along `nodes`
    pub total_cost: f64,
}

impl RoutePath {
    pub fn origin(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// Number of edges traversed
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Node coordinates along the route
    ///
    /// # Errors
    ///
    /// [`Error::InvalidNodeReference`] if a route node is not in `graph`.
    pub fn line_string(&self, graph: &RoadGraph) -> Result<LineString<f64>, Error> {
        self.nodes
            .iter()
            .map(|&id| {
                graph
                    .node(id)
                    .map(|node| Coord::from(node.geometry))
                    .ok_or(Error::InvalidNodeReference(id))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(LineString::new)
    }
}

/// Minimum-cost route from `origin` to `destination` under `weight`.
///
/// `total_cost` is recomputed from the returned route's edges rather than
/// taken from the search labels.
///
/// # Errors
///
/// - [`Error::InvalidNodeReference`] if either endpoint is not in the graph
/// - [`Error::NotAnnotated`] for a travel time weight of an unannotated mode
/// - [`Error::NoPath`] if `destination` is unreachable
/// - [`Error::InvalidWeight`] if a negative or NaN weight is encountered
pub fn shortest_path(
    graph: &RoadGraph,
    origin: NodeId,
    destination: NodeId,
    weight: &Weight,
) -> Result<RoutePath, Error> {
    weight.ensure_available(graph)?;
    let path = shortest_path_by(graph, origin, destination, |edge| weight.edge_weight(edge))?;
    debug!(
        "Route {origin} -> {destination} by {weight}: {} hops, cost {:.3}",
        path.hops(),
        path.total_cost
    );
    Ok(path)
}

/// [`shortest_path`] with a caller-supplied weight function. Edges for
/// which `weight` returns `None` are not traversable.
///
/// # Errors
///
/// Same as [`shortest_path`], except for [`Error::NotAnnotated`].
pub fn shortest_path_by<F>(
    graph: &RoadGraph,
    origin: NodeId,
    destination: NodeId,
    weight: F,
) -> Result<RoutePath, Error>
where
    F: Fn(&RoadEdge) -> Option<f64>,
{
    let start = graph.index_of(origin)?;
    let target = graph.index_of(destination)?;

    if start == target {
        return Ok(RoutePath {
            nodes: vec![origin],
            total_cost: 0.0,
        });
    }

    let tree = dijkstra(graph, start, Some(target), &weight)?;
    let nodes: Vec<NodeId> = tree
        .path_to(start, target)
        .ok_or(Error::NoPath {
            origin,
            destination,
        })?
        .into_iter()
        .map(|idx| graph.id_of(idx))
        .collect();

    let total_cost = route_cost_by(graph, &nodes, &weight)?;
    Ok(RoutePath { nodes, total_cost })
}

/// Aggregate `weight` along a node sequence, using the cheapest parallel
/// edge for each hop. A single-node route costs 0.
///
/// # Errors
///
/// - [`Error::InvalidNodeReference`] for unknown nodes
/// - [`Error::NotAnnotated`] for a travel time weight of an unannotated mode
/// - [`Error::DisconnectedRoute`] if consecutive nodes share no traversable edge
/// - [`Error::InvalidWeight`] for negative or NaN edge weights
pub fn route_cost(graph: &RoadGraph, route: &[NodeId], weight: &Weight) -> Result<f64, Error> {
    weight.ensure_available(graph)?;
    route_cost_by(graph, route, |edge| weight.edge_weight(edge))
}

pub(crate) fn route_cost_by<F>(graph: &RoadGraph, route: &[NodeId], weight: F) -> Result<f64, Error>
where
    F: Fn(&RoadEdge) -> Option<f64>,
{
    if let Some(&first) = route.first() {
        graph.index_of(first)?;
    }

    let mut total = 0.0;
    for (&from, &to) in route.iter().tuple_windows() {
        let mut cheapest: Option<f64> = None;
        for edge in graph.edges_between(from, to)? {
            let Some(value) = weight(edge) else {
                continue;
            };
            if value.is_nan() || value < 0.0 {
                return Err(Error::InvalidWeight {
                    source_node: from,
                    target_node: to,
                    value,
                });
            }
            if value.is_finite() {
                cheapest = Some(cheapest.map_or(value, |c| c.min(value)));
            }
        }
        total += cheapest.ok_or(Error::DisconnectedRoute(from, to))?;
    }

    Ok(total)
}
