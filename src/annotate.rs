//! Diagnostic overlay for human inspection of a located frame.
//!
//! The overlay starts from the grayscale frame and restores the true color
//! wherever the mask matched, then outlines the search area (green), every
//! candidate (red) and the selected detection (bold white). Text labels for
//! the detection are returned as positioned strings; drawing glyphs needs a
//! font, which is left to the consumer.

use image::{GrayImage, Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect as PixelRect;

use crate::detection::Detection;
use crate::geometry::{Point, Rect};

pub const SEARCH_AREA_COLOR: Rgba<u8> = Rgba([0, 255, 0, 255]);
pub const CANDIDATE_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);
pub const DETECTION_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const DETECTION_THICKNESS: i32 = 4;

/// Which side of the label's anchor the text extends to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Text sits on the anchor line, above it.
    Above,
    /// Text hangs from the anchor line, below it.
    Below,
}

/// Text to draw horizontally centered on `anchor`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub anchor: Point,
    pub placement: Placement,
}

/// What to outline on top of the base image.
#[derive(Clone, Copy, Debug, Default)]
pub struct Overlay<'a> {
    pub search_area: Option<&'a Rect>,
    pub candidates: &'a [Rect],
    pub detection: Option<&'a Detection>,
}

/// Renders overlays into a buffer reused across frames.
#[derive(Debug)]
pub struct Annotator {
    image: RgbaImage,
    labels: Vec<Label>,
}

impl Annotator {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            labels: Vec::new(),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn render(
        &mut self,
        color: &RgbaImage,
        gray: &GrayImage,
        mask: &GrayImage,
        overlay: &Overlay<'_>,
    ) -> &RgbaImage {
        if self.image.dimensions() != color.dimensions() {
            self.image = RgbaImage::new(color.width(), color.height());
        }

        for (x, y, out) in self.image.enumerate_pixels_mut() {
            *out = if mask.get_pixel(x, y)[0] != 0 {
                *color.get_pixel(x, y)
            } else {
                let g = gray.get_pixel(x, y)[0];
                Rgba([g, g, g, 255])
            };
        }

        if let Some(area) = overlay.search_area {
            outline(&mut self.image, area, SEARCH_AREA_COLOR, 1);
        }
        for candidate in overlay.candidates {
            outline(&mut self.image, candidate, CANDIDATE_COLOR, 1);
        }

        self.labels.clear();
        if let Some(detection) = overlay.detection {
            outline(
                &mut self.image,
                &detection.bounding_box,
                DETECTION_COLOR,
                DETECTION_THICKNESS,
            );
            self.labels = detection_labels(detection);
        }

        &self.image
    }
}

/// Zone above the box; center and area pair below it.
pub fn detection_labels(detection: &Detection) -> Vec<Label> {
    let bb = &detection.bounding_box;
    let center = bb.center();
    let mid_x = center.x;
    vec![
        Label {
            text: detection.zone.to_string(),
            anchor: Point::new(mid_x, bb.y - 5),
            placement: Placement::Above,
        },
        Label {
            text: format!("{}, {}", center.x, center.y),
            anchor: Point::new(mid_x, bb.y + bb.height + 5),
            placement: Placement::Below,
        },
        Label {
            text: format!("{} / {}", round_half_up(detection.contour_area), bb.area()),
            anchor: Point::new(mid_x, bb.y + bb.height + 20),
            placement: Placement::Below,
        },
    ]
}

/// Outline covering `tl..=br`, grown outward and inward around that line
/// when thicker than one pixel.
fn outline(image: &mut RgbaImage, rect: &Rect, color: Rgba<u8>, thickness: i32) {
    // Edges far outside the image are pulled in to just past its border, where
    // they stay invisible but keep the arithmetic below in range.
    let margin = i64::from(thickness) + 1;
    let (width, height) = (i64::from(image.width()), i64::from(image.height()));
    let clamp_x = |v: i64| v.clamp(-margin, width + margin);
    let clamp_y = |v: i64| v.clamp(-margin, height + margin);
    let x0 = clamp_x(i64::from(rect.x));
    let y0 = clamp_y(i64::from(rect.y));
    let x1 = clamp_x(i64::from(rect.x) + i64::from(rect.width));
    let y1 = clamp_y(i64::from(rect.y) + i64::from(rect.height));

    let lo = -i64::from((thickness - 1) / 2);
    let hi = i64::from(thickness / 2);
    for grow in lo..=hi {
        let w = x1 - x0 + 1 + 2 * grow;
        let h = y1 - y0 + 1 + 2 * grow;
        if w <= 0 || h <= 0 {
            continue;
        }
        let pixel_rect =
            PixelRect::at((x0 - grow) as i32, (y0 - grow) as i32).of_size(w as u32, h as u32);
        draw_hollow_rect_mut(image, pixel_rect, color);
    }
}

/// Whole number nearest to a non-negative `value`, halves rounded up.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
