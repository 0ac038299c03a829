//! Road network graph

use std::fmt;

use geo::{Coord, Point, Rect};
use hashbrown::HashMap;
use log::warn;
use petgraph::{
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};
use rstar::{RTree, primitives::GeomWithData};

use super::components::{EdgeAttributes, RoadEdge, RoadNode};
use crate::{EdgeKey, Error, NodeId, algo::nearest::unit_sphere_point, model::Mode};

/// Node position on the unit sphere, tagged with its graph index
pub type IndexedPoint = GeomWithData<[f64; 3], NodeIndex>;

/// Directed multigraph of road segments.
///
/// The graph exclusively owns its nodes and edges. Construction is
/// append-only; annotation mutates only the per-mode travel time fields.
#[derive(Clone)]
pub struct RoadGraph {
    pub(crate) graph: DiGraph<RoadNode, RoadEdge>,
    node_lookup: HashMap<NodeId, NodeIndex>,
    rtree: RTree<IndexedPoint>,
    annotated: [bool; Mode::COUNT],
}

impl RoadGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_lookup: HashMap::new(),
            rtree: RTree::new(),
            annotated: [false; Mode::COUNT],
        }
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            node_lookup: HashMap::with_capacity(nodes),
            rtree: RTree::new(),
            annotated: [false; Mode::COUNT],
        }
    }

    /// Inserts an intersection or road endpoint.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateNode`] if `id` is already present,
    /// [`Error::InvalidData`] for coordinates outside the valid range.
    pub fn add_node(&mut self, id: NodeId, lat: f64, lon: f64) -> Result<(), Error> {
        if !(lat.is_finite() && lon.is_finite() && lat.abs() <= 90.0 && lon.abs() <= 180.0) {
            return Err(Error::InvalidData(format!(
                "node {id} has invalid coordinates ({lat}, {lon})"
            )));
        }
        if self.node_lookup.contains_key(&id) {
            return Err(Error::DuplicateNode(id));
        }

        let idx = self.graph.add_node(RoadNode {
            id,
            geometry: Point::new(lon, lat),
        });
        self.node_lookup.insert(id, idx);
        self.rtree
            .insert(IndexedPoint::new(unit_sphere_point(lat, lon), idx));
        Ok(())
    }

    /// Inserts a directed edge and returns its parallel-edge key, which is
    /// one past the highest key already used between `source` and `target`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidNodeReference`] if either endpoint is unknown.
    pub fn add_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        attributes: EdgeAttributes,
    ) -> Result<EdgeKey, Error> {
        let (u, v) = (self.index_of(source)?, self.index_of(target)?);
        let key = self
            .graph
            .edges_connecting(u, v)
            .map(|edge| edge.weight().key + 1)
            .max()
            .unwrap_or(0);
        self.insert_edge(u, v, key, attributes);
        Ok(key)
    }

    /// Inserts a directed edge under an explicit parallel-edge key.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidNodeReference`] if either endpoint is unknown,
    /// [`Error::InvalidData`] if the key is already used for this pair.
    pub fn add_edge_with_key(
        &mut self,
        source: NodeId,
        target: NodeId,
        key: EdgeKey,
        attributes: EdgeAttributes,
    ) -> Result<(), Error> {
        let (u, v) = (self.index_of(source)?, self.index_of(target)?);
        if self
            .graph
            .edges_connecting(u, v)
            .any(|edge| edge.weight().key == key)
        {
            return Err(Error::InvalidData(format!(
                "edge {source} -> {target} with key {key} already exists"
            )));
        }
        self.insert_edge(u, v, key, attributes);
        Ok(())
    }

    fn insert_edge(&mut self, u: NodeIndex, v: NodeIndex, key: EdgeKey, attributes: EdgeAttributes) {
        let length_m = match attributes.length_m {
            Some(length) if length.is_finite() && length >= 0.0 => length,
            Some(length) => {
                warn!(
                    "Edge {} -> {} has invalid length {length}, using 0.0",
                    self.graph[u].id, self.graph[v].id
                );
                0.0
            }
            None => 0.0,
        };

        self.graph
            .add_edge(u, v, RoadEdge::new(key, length_m, attributes));
        // a new edge carries no travel time yet
        self.annotated = [false; Mode::COUNT];
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_lookup.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&RoadNode> {
        self.node_lookup.get(&id).map(|&idx| &self.graph[idx])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &RoadNode> {
        self.graph.node_weights()
    }

    /// All edges as `(source, target, edge)`
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &RoadEdge)> {
        self.graph.edge_references().map(|edge| {
            (
                self.graph[edge.source()].id,
                self.graph[edge.target()].id,
                edge.weight(),
            )
        })
    }

    /// Parallel edges from `source` to `target`
    ///
    /// # Errors
    ///
    /// [`Error::InvalidNodeReference`] if either endpoint is unknown.
    pub fn edges_between(
        &self,
        source: NodeId,
        target: NodeId,
    ) -> Result<impl Iterator<Item = &RoadEdge>, Error> {
        let (u, v) = (self.index_of(source)?, self.index_of(target)?);
        Ok(self.graph.edges_connecting(u, v).map(|edge| edge.weight()))
    }

    /// Whether every edge currently carries a travel time for `mode`
    pub fn is_annotated(&self, mode: Mode) -> bool {
        self.annotated[mode.index()]
    }

    /// Smallest rectangle containing every node, `None` for an empty graph
    pub fn bounding_box(&self) -> Option<Rect<f64>> {
        let mut nodes = self.graph.node_weights();
        let first = nodes.next()?.geometry;
        let (min, max) = nodes.fold((first.0, first.0), |(min, max), node| {
            let c = node.geometry.0;
            (
                Coord {
                    x: min.x.min(c.x),
                    y: min.y.min(c.y),
                },
                Coord {
                    x: max.x.max(c.x),
                    y: max.y.max(c.y),
                },
            )
        });
        Some(Rect::new(min, max))
    }

    pub(crate) fn index_of(&self, id: NodeId) -> Result<NodeIndex, Error> {
        self.node_lookup
            .get(&id)
            .copied()
            .ok_or(Error::InvalidNodeReference(id))
    }

    pub(crate) fn id_of(&self, idx: NodeIndex) -> NodeId {
        self.graph[idx].id
    }

    pub(crate) fn rtree(&self) -> &RTree<IndexedPoint> {
        &self.rtree
    }

    pub(crate) fn edges_mut(&mut self) -> impl Iterator<Item = &mut RoadEdge> {
        self.graph.edge_weights_mut()
    }

    pub(crate) fn mark_annotated(&mut self, mode: Mode) {
        self.annotated[mode.index()] = true;
    }
}

impl Default for RoadGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RoadGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoadGraph")
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .field("annotated", &self.annotated)
            .finish()
    }
}
