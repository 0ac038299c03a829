//! Effective edge speed per travel mode.
//!
//! Real road data is incompletely tagged, so resolution never fails:
//! a posted speed wins when it parses, then the mode's road-class default,
//! then the mode's fallback constant.

use log::trace;
use thiserror::Error;

use crate::model::{AttributeValue, Mode, RoadEdge, SpeedTable};

/// Data-quality problems absorbed by the resolver. They are logged and
/// replaced by a default, never returned to callers of [`resolve_speed`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpeedError {
    #[error("Malformed posted speed '{0}'")]
    MalformedSpeedValue(String),
    #[error("Unknown road class '{0}'")]
    UnknownRoadClass(String),
}

/// Where a resolved speed came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedSource {
    Posted,
    RoadClass,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedSpeed {
    pub kph: f64,
    pub source: SpeedSource,
}

/// Parses the leading number of a posted speed such as `"50"`,
/// `"50 km/h"` or `"30mph"`. Any unit suffix is ignored.
///
/// # Errors
///
/// [`SpeedError::MalformedSpeedValue`] when the value does not start with a number.
pub fn parse_posted_speed(raw: &str) -> Result<f64, SpeedError> {
    let token = raw.split_whitespace().next().unwrap_or_default();

    let mut seen_dot = false;
    let end = token
        .find(|c: char| {
            if c == '.' && !seen_dot {
                seen_dot = true;
                false
            } else {
                !c.is_ascii_digit()
            }
        })
        .unwrap_or(token.len());

    token[..end]
        .parse::<f64>()
        .ok()
        .filter(|kph| kph.is_finite())
        .ok_or_else(|| SpeedError::MalformedSpeedValue(raw.to_string()))
}

/// Effective speed in km/h of `edge` under `mode`
pub fn resolve_speed(edge: &RoadEdge, mode: Mode, table: &SpeedTable) -> f64 {
    resolve_speed_with_source(edge, mode, table).kph
}

pub fn resolve_speed_with_source(edge: &RoadEdge, mode: Mode, table: &SpeedTable) -> ResolvedSpeed {
    if let Some(raw) = edge.max_speed.as_ref().and_then(AttributeValue::first) {
        match parse_posted_speed(raw) {
            Ok(kph) => {
                return ResolvedSpeed {
                    kph,
                    source: SpeedSource::Posted,
                };
            }
            Err(e) => trace!("{e}, using {mode} road class default"),
        }
    }

    let class = edge.road_class.as_ref().and_then(AttributeValue::first);
    match class.map(|class| (class, table.class_speed(mode, class))) {
        Some((_, Some(kph))) => ResolvedSpeed {
            kph,
            source: SpeedSource::RoadClass,
        },
        Some((class, None)) => {
            trace!(
                "{}, using {mode} fallback",
                SpeedError::UnknownRoadClass(class.to_string())
            );
            ResolvedSpeed {
                kph: table.fallback(mode),
                source: SpeedSource::Fallback,
            }
        }
        None => ResolvedSpeed {
            kph: table.fallback(mode),
            source: SpeedSource::Fallback,
        },
    }
}
