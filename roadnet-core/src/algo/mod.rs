//! Edge speed and travel time derivation, and coordinate snapping

pub mod nearest;
pub mod speed;
pub mod travel_time;
