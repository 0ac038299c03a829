//! Batch routing over prebuilt road graphs.
//!
//! For every configured travel mode a graph is loaded, origin and
//! destination are snapped to their nearest nodes, and a distance route
//! and a travel time route are written as `GeoJSON`.

pub mod batch;
pub mod config;
mod error;

pub use batch::{ModeReport, run};
pub use config::{BatchConfig, Coordinate};
pub use error::BatchError;
