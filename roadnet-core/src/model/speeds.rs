//! Default speeds per travel mode and road class.
//!
//! The table is plain configuration data handed to the speed resolver and
//! the annotator; nothing in the crate reads it from global state.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{Error, model::Mode};

/// Class speeds (km/h) for one mode, plus the speed used when the road
/// class is absent or not listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeSpeeds {
    #[serde(default)]
    pub classes: HashMap<String, f64>,
    pub fallback_kph: f64,
}

impl ModeSpeeds {
    fn from_pairs(pairs: &[(&str, f64)], fallback_kph: f64) -> Self {
        Self {
            classes: pairs
                .iter()
                .map(|&(class, kph)| (class.to_string(), kph))
                .collect(),
            fallback_kph,
        }
    }
}

/// Per-mode override read from configuration. Listed classes replace or
/// extend the defaults; an absent fallback keeps the default one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModeSpeedsOverride {
    #[serde(default)]
    pub classes: HashMap<String, f64>,
    pub fallback_kph: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedTable {
    pub drive: ModeSpeeds,
    pub walk: ModeSpeeds,
    pub bike: ModeSpeeds,
}

impl Default for SpeedTable {
    fn default() -> Self {
        Self {
            drive: ModeSpeeds::from_pairs(
                &[
                    ("motorway", 90.0),
                    ("trunk", 80.0),
                    ("primary", 60.0),
                    ("secondary", 50.0),
                    ("tertiary", 40.0),
                    ("residential", 30.0),
                    ("unclassified", 30.0),
                    ("service", 20.0),
                ],
                40.0,
            ),
            walk: ModeSpeeds::from_pairs(
                &[
                    ("footway", 4.5),
                    ("path", 4.0),
                    ("pedestrian", 4.5),
                    ("residential", 4.5),
                ],
                4.5,
            ),
            bike: ModeSpeeds::from_pairs(
                &[
                    ("cycleway", 15.0),
                    ("residential", 12.0),
                    ("tertiary", 18.0),
                    ("secondary", 20.0),
                    ("primary", 22.0),
                ],
                15.0,
            ),
        }
    }
}

impl SpeedTable {
    pub fn for_mode(&self, mode: Mode) -> &ModeSpeeds {
        match mode {
            Mode::Drive => &self.drive,
            Mode::Walk => &self.walk,
            Mode::Bike => &self.bike,
        }
    }

    fn for_mode_mut(&mut self, mode: Mode) -> &mut ModeSpeeds {
        match mode {
            Mode::Drive => &mut self.drive,
            Mode::Walk => &mut self.walk,
            Mode::Bike => &mut self.bike,
        }
    }

    /// Speed listed for `class` under `mode`, if any
    pub fn class_speed(&self, mode: Mode, class: &str) -> Option<f64> {
        self.for_mode(mode).classes.get(class).copied()
    }

    pub fn fallback(&self, mode: Mode) -> f64 {
        self.for_mode(mode).fallback_kph
    }

    /// Applies configuration overrides on top of the current values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if any overriding speed is not a
    /// positive finite number; the table is left untouched in that case.
    pub fn apply_overrides<'a, I>(&mut self, overrides: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (Mode, &'a ModeSpeedsOverride)>,
    {
        let overrides: Vec<_> = overrides.into_iter().collect();

        for (mode, entry) in &overrides {
            let speeds = entry.classes.values().copied().chain(entry.fallback_kph);
            for kph in speeds {
                if !(kph.is_finite() && kph > 0.0) {
                    return Err(Error::InvalidData(format!(
                        "speed override {kph} for mode {mode} must be a positive number"
                    )));
                }
            }
        }

        for (mode, entry) in overrides {
            let speeds = self.for_mode_mut(mode);
            speeds
                .classes
                .extend(entry.classes.iter().map(|(class, &kph)| (class.clone(), kph)));
            if let Some(fallback) = entry.fallback_kph {
                speeds.fallback_kph = fallback;
            }
        }

        Ok(())
    }
}
