use anyhow::Result;
use image::{GrayImage, ImageBuffer, Rgb, RgbaImage};

use crate::geometry::{self, Contour, Rect};

/// Three-channel image whose channels are hue, saturation and value.
///
/// Hue is stored in half-degrees (`0..180`), saturation and value in `0..=255`.
pub type HsvImage = ImageBuffer<Rgb<u8>, Vec<u8>>;

/// Inclusive per-channel HSV range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HsvRange {
    pub min: [u8; 3],
    pub max: [u8; 3],
}

impl HsvRange {
    pub const fn new(min: [u8; 3], max: [u8; 3]) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|c| self.min[c] <= hsv[c] && hsv[c] <= self.max[c])
    }
}

/// Image-processing primitives the locator is built on.
///
/// The detection algorithm only talks to the vision library through this
/// trait, so a backend can be swapped without touching selection logic.
/// Output buffers are passed in and resized by the backend when their
/// dimensions do not match the input.
pub trait VisionKernel: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Convert an RGBA frame to HSV. Alpha is ignored.
    fn convert_color_space(&self, rgba: &RgbaImage, hsv: &mut HsvImage) -> Result<()>;

    /// Write 255 where every channel is inside `range`, 0 elsewhere.
    fn threshold_range(&self, hsv: &HsvImage, range: &HsvRange, mask: &mut GrayImage)
        -> Result<()>;

    /// Trace every border of the non-zero regions of `mask`, outer borders
    /// and hole borders alike, in raster discovery order.
    fn find_contours(&self, mask: &GrayImage) -> Result<Vec<Contour>>;

    /// Polygon area enclosed by the contour points.
    fn contour_area(&self, contour: &Contour) -> f64 {
        geometry::polygon_area(&contour.points)
    }

    /// Smallest upright rectangle containing every contour point.
    fn bounding_rect(&self, contour: &Contour) -> Rect {
        geometry::bounding_rect(&contour.points)
    }

    /// Readiness check, run once when a locator session opens.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}
