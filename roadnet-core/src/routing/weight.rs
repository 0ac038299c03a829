use std::fmt;

use crate::{
    Error,
    model::{Mode, RoadEdge, RoadGraph},
};

/// Edge field minimised by a shortest-path query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Weight {
    /// Physical length in meters
    Length,
    /// Travel time in seconds for the given mode; requires annotation
    TravelTime(Mode),
    /// A named numeric edge attribute supplied with the graph
    Attribute(String),
}

impl Weight {
    /// Cost of traversing `edge`, `None` when the edge lacks the field
    pub fn edge_weight(&self, edge: &RoadEdge) -> Option<f64> {
        match self {
            Weight::Length => Some(edge.length_m),
            Weight::TravelTime(mode) => edge.travel_time_s(*mode),
            Weight::Attribute(name) => edge.attribute(name),
        }
    }

    pub(crate) fn ensure_available(&self, graph: &RoadGraph) -> Result<(), Error> {
        match self {
            Weight::TravelTime(mode) if !graph.is_annotated(*mode) => Err(Error::NotAnnotated(*mode)),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weight::Length => f.write_str("length"),
            Weight::TravelTime(mode) => write!(f, "travel_time[{mode}]"),
            Weight::Attribute(name) => f.write_str(name),
        }
    }
}
