//! Shortest paths over the road graph

mod dijkstra;
pub mod matrix;
pub mod path;
mod to_geojson;
pub mod weight;

pub use matrix::cost_matrix;
pub use path::{RoutePath, route_cost, shortest_path, shortest_path_by};
pub use weight::Weight;
