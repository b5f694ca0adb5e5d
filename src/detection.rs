use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::geometry::Rect;

/// Horizontal zone of the detected mineral within the search area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Zone {
    #[default]
    Unknown,
    Left,
    Center,
    Right,
}

impl Zone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Unknown => "UNKNOWN",
            Zone::Left => "LEFT",
            Zone::Center => "CENTER",
            Zone::Right => "RIGHT",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Zone::Unknown)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Zone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UNKNOWN" => Ok(Zone::Unknown),
            "LEFT" => Ok(Zone::Left),
            "CENTER" => Ok(Zone::Center),
            "RIGHT" => Ok(Zone::Right),
            other => Err(format!("unknown zone '{}'", other)),
        }
    }
}

/// A confident detection in one frame.
///
/// The locator stores `Option<Detection>`: `None` is the UNKNOWN outcome, so
/// a stored detection always carries a known zone.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Detection {
    pub zone: Zone,
    pub bounding_box: Rect,
    /// Area enclosed by the traced contour (not the pixel count).
    pub contour_area: f64,
}
