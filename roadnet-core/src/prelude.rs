pub use crate::Error;
pub use crate::algo::nearest::{nearest_node, nearest_node_with_distance};
pub use crate::algo::speed::{SpeedError, parse_posted_speed, resolve_speed};
pub use crate::algo::travel_time::{annotate, travel_time_seconds};
pub use crate::loading::{load_road_graph, road_graph_from_reader};
pub use crate::model::{
    AttributeValue, EdgeAttributes, Mode, ModeSpeeds, ModeSpeedsOverride, RoadEdge, RoadGraph,
    RoadNode, SpeedTable,
};
pub use crate::routing::{RoutePath, Weight, cost_matrix, route_cost, shortest_path};

// Identifiers
pub use crate::EdgeKey;
pub use crate::NodeId;
