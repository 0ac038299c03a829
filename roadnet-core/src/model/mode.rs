use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Travel modality. Selects the default-speed table and which per-mode
/// travel time an edge weight refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Drive,
    Walk,
    Bike,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Drive, Mode::Walk, Mode::Bike];
    pub const COUNT: usize = Self::ALL.len();

    pub(crate) fn index(self) -> usize {
        match self {
            Mode::Drive => 0,
            Mode::Walk => 1,
            Mode::Bike => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Drive => "drive",
            Mode::Walk => "walk",
            Mode::Bike => "bike",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drive" => Ok(Mode::Drive),
            "walk" => Ok(Mode::Walk),
            "bike" => Ok(Mode::Bike),
            other => Err(Error::InvalidData(format!("unknown travel mode '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Walk".parse::<Mode>().unwrap(), Mode::Walk);
        assert_eq!(" bike ".parse::<Mode>().unwrap(), Mode::Bike);
        assert!("transit".parse::<Mode>().is_err());
    }

    #[test]
    fn indices_are_distinct() {
        let mut seen = [false; Mode::COUNT];
        for mode in Mode::ALL {
            assert!(!seen[mode.index()]);
            seen[mode.index()] = true;
        }
    }
}
