//! Serde model of the node-link JSON graph document

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{EdgeKey, NodeId, model::AttributeValue};

fn default_directed() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct NodeLinkDocument {
    #[serde(default = "default_directed")]
    pub directed: bool,
    pub nodes: Vec<NodeLinkNode>,
    #[serde(alias = "edges")]
    pub links: Vec<NodeLinkEdge>,
}

#[derive(Debug, Deserialize)]
pub struct NodeLinkNode {
    pub id: NodeId,
    #[serde(alias = "lon")]
    pub x: f64,
    #[serde(alias = "lat")]
    pub y: f64,
}

#[derive(Debug, Deserialize)]
pub struct NodeLinkEdge {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub key: Option<EdgeKey>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub maxspeed: Option<RawAttribute>,
    #[serde(default)]
    pub highway: Option<RawAttribute>,
    /// Everything else on the link; numeric entries become edge attributes
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    Text(String),
    Number(f64),
}

impl RawScalar {
    fn into_text(self) -> String {
        match self {
            RawScalar::Text(text) => text,
            RawScalar::Number(number) => number.to_string(),
        }
    }
}

/// A tag given as a string, a number or a list of either
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawAttribute {
    Scalar(RawScalar),
    List(Vec<RawScalar>),
}

impl From<RawAttribute> for AttributeValue {
    fn from(raw: RawAttribute) -> Self {
        match raw {
            RawAttribute::Scalar(value) => AttributeValue::Single(value.into_text()),
            RawAttribute::List(values) => {
                AttributeValue::Multi(values.into_iter().map(RawScalar::into_text).collect())
            }
        }
    }
}
