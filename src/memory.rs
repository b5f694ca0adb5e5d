//! Last-known detection memory.

use crate::detection::{Detection, Zone};
use crate::geometry::Rect;

/// Holds the most recent confident detection across frames that had none.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionMemory {
    last: Option<Detection>,
}

impl DetectionMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `current` if it is a detection with a known zone. Returns true
    /// when it was stored.
    pub fn record(&mut self, current: Option<&Detection>) -> bool {
        match current {
            Some(detection) if detection.zone.is_known() => {
                self.last = Some(*detection);
                true
            }
            _ => false,
        }
    }

    pub fn last(&self) -> Option<&Detection> {
        self.last.as_ref()
    }

    pub fn zone(&self) -> Zone {
        self.last.map(|d| d.zone).unwrap_or_default()
    }

    pub fn bounding_box(&self) -> Option<Rect> {
        self.last.map(|d| d.bounding_box)
    }

    pub fn contour_area(&self) -> f64 {
        self.last.map(|d| d.contour_area).unwrap_or(0.0)
    }
}
