//! Data model of the road network

pub mod mode;
pub mod speeds;
pub mod streets;

pub use mode::Mode;
pub use speeds::{ModeSpeeds, ModeSpeedsOverride, SpeedTable};
pub use streets::{AttributeValue, EdgeAttributes, IndexedPoint, RoadEdge, RoadGraph, RoadNode};
