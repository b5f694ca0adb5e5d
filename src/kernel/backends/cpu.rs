use anyhow::{anyhow, Result};
use image::{imageops, GrayImage, Luma, Rgb, Rgba, RgbaImage};
use imageproc::contours::{self, BorderType};

use crate::geometry::{BorderKind, Contour, Point};
use crate::kernel::backend::{HsvImage, HsvRange, VisionKernel};

/// CPU kernel built on `image` buffers and `imageproc` border following.
#[derive(Debug, Default)]
pub struct ImageprocKernel {
    warmed_up: bool,
}

impl ImageprocKernel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_warmed_up(&self) -> bool {
        self.warmed_up
    }
}

/// 8-bit RGB to HSV with hue in half-degrees, matching the range most
/// vision tooling uses for byte images.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> [u8; 3] {
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
    let v = r.max(g).max(b);
    let diff = v - r.min(g).min(b);

    let s = if v == 0 { 0 } else { (255 * diff + v / 2) / v };

    let h = if diff == 0 {
        0.0
    } else {
        let diff = f64::from(diff);
        let degrees = if v == r {
            60.0 * f64::from(g - b) / diff
        } else if v == g {
            120.0 + 60.0 * f64::from(b - r) / diff
        } else {
            240.0 + 60.0 * f64::from(r - g) / diff
        };
        if degrees < 0.0 {
            degrees + 360.0
        } else {
            degrees
        }
    };
    let h = ((h / 2.0).round() as i32) % 180;

    [h as u8, s as u8, v as u8]
}

impl VisionKernel for ImageprocKernel {
    fn name(&self) -> &'static str {
        "imageproc"
    }

    fn convert_color_space(&self, rgba: &RgbaImage, hsv: &mut HsvImage) -> Result<()> {
        if hsv.dimensions() != rgba.dimensions() {
            *hsv = HsvImage::new(rgba.width(), rgba.height());
        }
        for (src, dst) in rgba.pixels().zip(hsv.pixels_mut()) {
            let Rgba([r, g, b, _]) = *src;
            *dst = Rgb(rgb_to_hsv(r, g, b));
        }
        Ok(())
    }

    fn threshold_range(
        &self,
        hsv: &HsvImage,
        range: &HsvRange,
        mask: &mut GrayImage,
    ) -> Result<()> {
        if mask.dimensions() != hsv.dimensions() {
            *mask = GrayImage::new(hsv.width(), hsv.height());
        }
        for (src, dst) in hsv.pixels().zip(mask.pixels_mut()) {
            *dst = if range.contains(src.0) {
                Luma([255])
            } else {
                Luma([0])
            };
        }
        Ok(())
    }

    fn find_contours(&self, mask: &GrayImage) -> Result<Vec<Contour>> {
        // Border following only starts a border after a background pixel, so
        // regions touching the frame edge need a zero frame around them.
        let mut padded = GrayImage::new(mask.width() + 2, mask.height() + 2);
        imageops::replace(&mut padded, mask, 1, 1);

        let traced = contours::find_contours::<i32>(&padded);
        Ok(traced
            .into_iter()
            .map(|c| Contour {
                points: c.points.iter().map(|p| Point::new(p.x - 1, p.y - 1)).collect(),
                kind: match c.border_type {
                    BorderType::Outer => BorderKind::Outer,
                    BorderType::Hole => BorderKind::Hole,
                },
                parent: c.parent,
            })
            .collect())
    }

    fn warm_up(&mut self) -> Result<()> {
        // Push a small gold patch through the whole chain and expect one border back.
        let probe = RgbaImage::from_pixel(3, 3, Rgba([255, 200, 0, 255]));
        let mut hsv = HsvImage::new(3, 3);
        let mut mask = GrayImage::new(3, 3);
        self.convert_color_space(&probe, &mut hsv)?;
        self.threshold_range(&hsv, &HsvRange::new([0, 0, 0], [179, 255, 255]), &mut mask)?;
        let traced = self.find_contours(&mask)?;
        if traced.len() != 1 {
            return Err(anyhow!(
                "imageproc kernel self-check traced {} borders, expected 1",
                traced.len()
            ));
        }
        self.warmed_up = true;
        Ok(())
    }
}
