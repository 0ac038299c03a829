use rayon::prelude::*;

use super::{dijkstra::dijkstra, weight::Weight};
use crate::{Error, NodeId, model::RoadGraph};

/// Cost of the cheapest route from every source to every target.
///
/// `result[i][j]` is `None` when `targets[j]` is unreachable from
/// `sources[i]`. Each row is one single-source search; rows run in parallel.
///
/// # Errors
///
/// - [`Error::InvalidNodeReference`] if any source or target is unknown
/// - [`Error::NotAnnotated`] for a travel time weight of an unannotated mode
/// - [`Error::InvalidWeight`] if a negative or NaN weight is encountered
pub fn cost_matrix(
    graph: &RoadGraph,
    sources: &[NodeId],
    targets: &[NodeId],
    weight: &Weight,
) -> Result<Vec<Vec<Option<f64>>>, Error> {
    weight.ensure_available(graph)?;

    let source_nodes = sources
        .iter()
        .map(|&id| graph.index_of(id))
        .collect::<Result<Vec<_>, _>>()?;
    let target_nodes = targets
        .iter()
        .map(|&id| graph.index_of(id))
        .collect::<Result<Vec<_>, _>>()?;

    source_nodes
        .par_iter()
        .map(|&source| -> Result<Vec<Option<f64>>, Error> {
            let tree = dijkstra(graph, source, None, |edge| weight.edge_weight(edge))?;
            Ok(target_nodes
                .iter()
                .map(|target| tree.costs.get(target).copied())
                .collect())
        })
        .collect()
}
