//! Loading road graphs handed over by an external graph-construction step

mod builder;
pub mod raw_types;

pub use builder::{build_road_graph, load_road_graph, road_graph_from_reader};
pub use raw_types::NodeLinkDocument;
