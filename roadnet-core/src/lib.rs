//! Weighted multimodal road-graph routing.
//!
//! The crate holds an in-memory directed multigraph of road segments,
//! derives per-mode travel times from posted speeds or road-class defaults,
//! snaps coordinates to graph nodes and computes minimum-cost routes under
//! a selectable edge weight.

pub mod algo;
pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use algo::nearest::{nearest_node, nearest_node_with_distance};
pub use algo::speed::{SpeedError, parse_posted_speed, resolve_speed};
pub use algo::travel_time::{MIN_SPEED_KPH, MIN_TRAVEL_TIME_S, annotate, travel_time_seconds};
pub use error::Error;
pub use loading::{load_road_graph, road_graph_from_reader};
pub use model::{
    AttributeValue, EdgeAttributes, Mode, ModeSpeeds, RoadEdge, RoadGraph, RoadNode, SpeedTable,
};
pub use routing::{RoutePath, Weight, cost_matrix, route_cost, shortest_path, shortest_path_by};

/// OSM-style node identifier
pub type NodeId = i64;
/// Distinguishes parallel edges between the same ordered node pair
pub type EdgeKey = u32;
