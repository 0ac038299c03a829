use std::collections::BinaryHeap;

use fixedbitset::FixedBitSet;
use hashbrown::{HashMap, hash_map::Entry};
use petgraph::{graph::NodeIndex, visit::EdgeRef};

use super::state::State;
use crate::{Error, model::RoadEdge, model::RoadGraph};

/// Settled costs and shortest-path predecessors of one search
#[derive(Debug, Default)]
pub(crate) struct SearchTree {
    pub(crate) costs: HashMap<NodeIndex, f64>,
    predecessors: HashMap<NodeIndex, NodeIndex>,
}

impl SearchTree {
    /// Node sequence from the search origin to `target`, `None` if unreached
    pub(crate) fn path_to(&self, origin: NodeIndex, target: NodeIndex) -> Option<Vec<NodeIndex>> {
        if !self.costs.contains_key(&target) {
            return None;
        }

        let mut path = vec![target];
        let mut current = target;
        while current != origin {
            current = *self.predecessors.get(&current)?;
            path.push(current);
        }
        path.reverse();
        Some(path)
    }
}

/// Label-setting shortest path search from `start`.
///
/// Stops once `target` is settled, or explores everything reachable when
/// no target is given. Edges for which `weight` returns `None` or an
/// infinite value are not traversable. Parallel edges are all relaxed, so
/// the cheapest one decides.
///
/// # Errors
///
/// [`Error::InvalidWeight`] when a traversed edge has a negative or NaN weight.
pub(crate) fn dijkstra<F>(
    graph: &RoadGraph,
    start: NodeIndex,
    target: Option<NodeIndex>,
    weight: F,
) -> Result<SearchTree, Error>
where
    F: Fn(&RoadEdge) -> Option<f64>,
{
    let node_count = graph.graph.node_count();
    let mut settled = FixedBitSet::with_capacity(node_count);
    let mut tree = SearchTree::default();
    let mut heap = BinaryHeap::new();

    heap.push(State {
        cost: 0.0,
        node: start,
    });
    tree.costs.insert(start, 0.0);

    while let Some(State { cost, node }) = heap.pop() {
        // Stale heap entry
        if settled.put(node.index()) {
            continue;
        }

        if target == Some(node) {
            break;
        }

        for edge in graph.graph.edges(node) {
            let Some(edge_weight) = weight(edge.weight()) else {
                continue;
            };
            if edge_weight.is_nan() || edge_weight < 0.0 {
                return Err(Error::InvalidWeight {
                    source_node: graph.id_of(node),
                    target_node: graph.id_of(edge.target()),
                    value: edge_weight,
                });
            }
            if edge_weight.is_infinite() {
                continue;
            }

            let next = edge.target();
            if settled.contains(next.index()) {
                continue;
            }
            let next_cost = cost + edge_weight;

            match tree.costs.entry(next) {
                Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    tree.predecessors.insert(next, node);
                    heap.push(State {
                        cost: next_cost,
                        node: next,
                    });
                }
                Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        tree.predecessors.insert(next, node);
                        heap.push(State {
                            cost: next_cost,
                            node: next,
                        });
                    }
                }
            }
        }
    }

    // Labels of unsettled nodes are only tentative
    tree.costs.retain(|node, _| settled.contains(node.index()));

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EdgeAttributes;

    fn line() -> RoadGraph {
        let mut graph = RoadGraph::new();
        for id in 0..4 {
            graph.add_node(id, 0.0, f64::from(id as i32) * 0.001).unwrap();
        }
        graph.add_edge(0, 1, EdgeAttributes::new(10.0)).unwrap();
        graph.add_edge(1, 2, EdgeAttributes::new(10.0)).unwrap();
        graph.add_edge(2, 3, EdgeAttributes::new(10.0)).unwrap();
        graph.add_edge(0, 2, EdgeAttributes::new(25.0)).unwrap();
        graph
    }

    #[test]
    fn settles_all_reachable_nodes() {
        let graph = line();
        let start = graph.index_of(0).unwrap();
        let tree = dijkstra(&graph, start, None, |e| Some(e.length_m)).unwrap();

        assert_eq!(tree.costs.len(), 4);
        assert_eq!(tree.costs[&graph.index_of(2).unwrap()], 20.0);
        assert_eq!(tree.costs[&graph.index_of(3).unwrap()], 30.0);
    }

    #[test]
    fn early_exit_keeps_only_settled_labels() {
        let graph = line();
        let (start, target) = (graph.index_of(0).unwrap(), graph.index_of(1).unwrap());
        let tree = dijkstra(&graph, start, Some(target), |e| Some(e.length_m)).unwrap();

        assert_eq!(tree.path_to(start, target), Some(vec![start, target]));
        assert!(tree.costs.len() <= 2);
    }

    #[test]
    fn untraversable_edges_are_skipped() {
        let graph = line();
        let start = graph.index_of(0).unwrap();
        let tree = dijkstra(&graph, start, None, |e| (e.length_m < 20.0).then_some(e.length_m)).unwrap();
        assert_eq!(tree.costs[&graph.index_of(2).unwrap()], 20.0);

        let tree = dijkstra(&graph, start, None, |_| Some(f64::INFINITY)).unwrap();
        assert_eq!(tree.costs.len(), 1);
    }

    #[test]
    fn negative_weight_is_rejected() {
        let graph = line();
        let start = graph.index_of(0).unwrap();
        assert!(matches!(
            dijkstra(&graph, start, None, |_| Some(-1.0)),
            Err(Error::InvalidWeight { source_node: 0, .. })
        ));
    }
}
