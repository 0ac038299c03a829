use thiserror::Error;

use crate::{NodeId, model::Mode};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Graph has no nodes")]
    EmptyGraph,
    #[error("Node {0} is not present in the graph")]
    InvalidNodeReference(NodeId),
    #[error("No path from node {origin} to node {destination}")]
    NoPath { origin: NodeId, destination: NodeId },
    #[error("Node {0} was inserted twice")]
    DuplicateNode(NodeId),
    #[error("Graph is not annotated with {0} travel times")]
    NotAnnotated(Mode),
    #[error("Edge {source_node} -> {target_node} has invalid weight {value}")]
    InvalidWeight {
        source_node: NodeId,
        target_node: NodeId,
        value: f64,
    },
    #[error("Route nodes {0} and {1} are not connected by an edge")]
    DisconnectedRoute(NodeId, NodeId),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
}

impl Error {
    /// `true` for outcomes a caller iterating over many queries should log
    /// and move past rather than abort on.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::NoPath { .. } | Error::EmptyGraph)
    }
}
