//! Road network components - nodes, edges and their attributes

use geo::Point;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{EdgeKey, NodeId, model::Mode};

/// Road graph node
#[derive(Debug, Clone)]
pub struct RoadNode {
    pub id: NodeId,
    /// Node coordinates, x = longitude, y = latitude
    pub geometry: Point<f64>,
}

impl RoadNode {
    pub fn lat(&self) -> f64 {
        self.geometry.y()
    }

    pub fn lon(&self) -> f64 {
        self.geometry.x()
    }
}

/// Tag value that source data may give once or as a list of values
/// (one per merged sub-segment). Consumers use the first value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Single(String),
    Multi(Vec<String>),
}

impl AttributeValue {
    pub fn first(&self) -> Option<&str> {
        match self {
            AttributeValue::Single(value) => Some(value.as_str()),
            AttributeValue::Multi(values) => values.first().map(String::as_str),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Single(value.to_string())
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Single(value.to_string())
    }
}

impl<S: Into<String>> From<Vec<S>> for AttributeValue {
    fn from(values: Vec<S>) -> Self {
        AttributeValue::Multi(values.into_iter().map(Into::into).collect())
    }
}

/// Attributes supplied when an edge is inserted
#[derive(Debug, Clone, Default)]
pub struct EdgeAttributes {
    /// Physical length in meters; `None` is treated as 0.0
    pub length_m: Option<f64>,
    /// Posted speed, possibly with a unit suffix ("50 km/h")
    pub max_speed: Option<AttributeValue>,
    /// Road type, e.g. "primary" or "footway"
    pub road_class: Option<AttributeValue>,
    /// Additional numeric fields usable as query weights
    pub extra: HashMap<String, f64>,
}

impl EdgeAttributes {
    pub fn new(length_m: f64) -> Self {
        Self {
            length_m: Some(length_m),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_max_speed(mut self, value: impl Into<AttributeValue>) -> Self {
        self.max_speed = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_road_class(mut self, value: impl Into<AttributeValue>) -> Self {
        self.road_class = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_extra(mut self, name: impl Into<String>, value: f64) -> Self {
        self.extra.insert(name.into(), value);
        self
    }
}

/// Road graph edge (directed road segment)
#[derive(Debug, Clone)]
pub struct RoadEdge {
    pub key: EdgeKey,
    pub length_m: f64,
    pub max_speed: Option<AttributeValue>,
    pub road_class: Option<AttributeValue>,
    pub extra: HashMap<String, f64>,
    /// One derived travel time per mode, absent until annotated
    travel_times: [Option<f64>; Mode::COUNT],
}

impl RoadEdge {
    pub(crate) fn new(key: EdgeKey, length_m: f64, attributes: EdgeAttributes) -> Self {
        Self {
            key,
            length_m,
            max_speed: attributes.max_speed,
            road_class: attributes.road_class,
            extra: attributes.extra,
            travel_times: [None; Mode::COUNT],
        }
    }

    /// Travel time in seconds for `mode`, if the edge was annotated for it
    pub fn travel_time_s(&self, mode: Mode) -> Option<f64> {
        self.travel_times[mode.index()]
    }

    pub(crate) fn set_travel_time_s(&mut self, mode: Mode, seconds: f64) {
        self.travel_times[mode.index()] = Some(seconds);
    }

    pub fn attribute(&self, name: &str) -> Option<f64> {
        self.extra.get(name).copied()
    }
}
