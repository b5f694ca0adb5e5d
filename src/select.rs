//! Blob selection, zone classification and candidate retention.

use crate::blob::Blob;
use crate::detection::{Detection, Zone};
use crate::geometry::Rect;

pub const DEFAULT_CENTER_MIN: f64 = 0.3;
pub const DEFAULT_CENTER_MAX: f64 = 0.7;
pub const DEFAULT_SELECTED_MIN_AREA: f64 = 2000.0;

/// Split points of the search area's width between LEFT, CENTER and RIGHT.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoneThresholds {
    pub center_min: f64,
    pub center_max: f64,
}

impl Default for ZoneThresholds {
    fn default() -> Self {
        Self {
            center_min: DEFAULT_CENTER_MIN,
            center_max: DEFAULT_CENTER_MAX,
        }
    }
}

impl ZoneThresholds {
    /// Both split points belong to CENTER.
    pub fn classify(&self, fraction: f64) -> Zone {
        if fraction < self.center_min {
            Zone::Left
        } else if fraction > self.center_max {
            Zone::Right
        } else {
            Zone::Center
        }
    }

    pub fn zone_of(&self, bounding_box: &Rect, search_area: &Rect) -> Zone {
        self.classify(relative_center(bounding_box, search_area))
    }
}

/// Horizontal center of `bounding_box` as a fraction of the search area width,
/// measured from its left edge. The half width is an integer division.
pub fn relative_center(bounding_box: &Rect, search_area: &Rect) -> f64 {
    let offset = i64::from(bounding_box.x) - i64::from(search_area.x)
        + i64::from(bounding_box.width / 2);
    offset as f64 / f64::from(search_area.width)
}

/// Area floors for the selected blob and for diagnostic candidates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AreaThresholds {
    /// Minimum contour area of the largest blob for it to count as a detection.
    pub selected_min: f64,
    /// Bounding-box area a blob must exceed to be kept as a candidate.
    pub candidate_min: f64,
}

impl Default for AreaThresholds {
    fn default() -> Self {
        Self::from_selected_min(DEFAULT_SELECTED_MIN_AREA)
    }
}

impl AreaThresholds {
    /// Candidate floor derived as half the selection floor, rounded down.
    pub fn from_selected_min(selected_min: f64) -> Self {
        Self {
            selected_min,
            candidate_min: (selected_min / 2.0).floor(),
        }
    }
}

/// Result of one selection pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    pub detection: Option<Detection>,
    /// Bounding boxes in blob order.
    pub candidates: Vec<Rect>,
}

impl Selection {
    pub fn zone(&self) -> Zone {
        self.detection.map(|d| d.zone).unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Selector {
    pub areas: AreaThresholds,
    pub zones: ZoneThresholds,
}

impl Selector {
    pub fn new(areas: AreaThresholds, zones: ZoneThresholds) -> Self {
        Self { areas, zones }
    }

    /// Pick the largest blob as the detection and collect the candidates.
    ///
    /// Candidates are blobs whose bounding box exceeds the candidate floor
    /// and has no corner inside the selected box. When the largest blob is
    /// below the selection floor there is no selected box, so nothing is
    /// excluded by position and the largest blob itself may be listed.
    pub fn select(&self, blobs: &[Blob], search_area: &Rect) -> Selection {
        let Some(largest) = largest_blob(blobs) else {
            return Selection::default();
        };

        let detection = (largest.area >= self.areas.selected_min).then(|| Detection {
            zone: self.zones.zone_of(&largest.bounding_box, search_area),
            bounding_box: largest.bounding_box,
            contour_area: largest.area,
        });

        let selected_box = detection.as_ref().map(|d| d.bounding_box);
        let candidates = blobs
            .iter()
            .map(|blob| blob.bounding_box)
            .filter(|bb| bb.area() as f64 > self.areas.candidate_min)
            .filter(|bb| {
                selected_box
                    .map(|selected| !selected.contains_any_corner_of(bb))
                    .unwrap_or(true)
            })
            .collect();

        Selection {
            detection,
            candidates,
        }
    }
}

/// First blob with the maximum area.
fn largest_blob(blobs: &[Blob]) -> Option<&Blob> {
    let mut iter = blobs.iter();
    let mut best = iter.next()?;
    for blob in iter {
        if blob.area > best.area {
            best = blob;
        }
    }
    Some(best)
}
