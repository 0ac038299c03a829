//! Road network model

pub mod components;
pub mod network;

pub use components::{AttributeValue, EdgeAttributes, RoadEdge, RoadNode};
pub use network::{IndexedPoint, RoadGraph};
