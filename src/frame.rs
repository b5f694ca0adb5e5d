//! Frame pairs handed to the locator.
//!
//! A located frame arrives as two images of the same scene: the RGBA color
//! frame used for segmentation, and a grayscale rendition used as the
//! annotation backdrop. Both are borrowed; the locator never mutates them.

use image::{imageops, GrayImage, RgbaImage};

use crate::error::{LocatorError, Result};

/// Validated color + grayscale view of one frame.
#[derive(Clone, Copy, Debug)]
pub struct FramePair<'a> {
    color: &'a RgbaImage,
    gray: &'a GrayImage,
}

impl<'a> FramePair<'a> {
    /// Check that both frames are non-empty and the same size.
    pub fn new(color: &'a RgbaImage, gray: &'a GrayImage) -> Result<Self> {
        if color.width() == 0 || color.height() == 0 {
            return Err(LocatorError::precondition("color frame is empty"));
        }
        if gray.width() == 0 || gray.height() == 0 {
            return Err(LocatorError::precondition("grayscale frame is empty"));
        }
        if color.dimensions() != gray.dimensions() {
            return Err(LocatorError::precondition(format!(
                "color frame is {}x{} but grayscale frame is {}x{}",
                color.width(),
                color.height(),
                gray.width(),
                gray.height()
            )));
        }
        Ok(Self { color, gray })
    }

    pub fn color(&self) -> &'a RgbaImage {
        self.color
    }

    pub fn gray(&self) -> &'a GrayImage {
        self.gray
    }

    pub fn width(&self) -> u32 {
        self.color.width()
    }

    pub fn height(&self) -> u32 {
        self.color.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.color.dimensions()
    }
}

/// Grayscale rendition of a color frame, for callers that only have color.
pub fn to_gray(color: &RgbaImage) -> GrayImage {
    imageops::grayscale(color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn accepts_matching_frames() -> Result<()> {
        let color = RgbaImage::new(8, 4);
        let gray = GrayImage::new(8, 4);
        let pair = FramePair::new(&color, &gray)?;
        assert_eq!(pair.dimensions(), (8, 4));
        Ok(())
    }

    #[test]
    fn rejects_empty_frames() {
        let color = RgbaImage::new(0, 4);
        let gray = GrayImage::new(0, 4);
        let err = FramePair::new(&color, &gray).unwrap_err();
        assert!(err.is_precondition_violation());
    }

    #[test]
    fn rejects_mismatched_frames() {
        let color = RgbaImage::new(8, 4);
        let gray = GrayImage::new(4, 8);
        let err = FramePair::new(&color, &gray).unwrap_err();
        assert!(err.is_precondition_violation());
        assert!(err.to_string().contains("8x4"));
    }

    #[test]
    fn gray_keeps_neutral_tones_and_weights_green_highest() {
        let color = RgbaImage::from_fn(6, 1, |x, _| match x {
            0 => Rgba([255, 255, 255, 255]),
            1 => Rgba([128, 128, 128, 255]),
            2 => Rgba([0, 0, 0, 255]),
            3 => Rgba([255, 0, 0, 255]),
            4 => Rgba([0, 255, 0, 255]),
            _ => Rgba([0, 0, 255, 255]),
        });
        let gray = to_gray(&color);
        assert_eq!(gray.dimensions(), (6, 1));
        assert_eq!(gray.get_pixel(0, 0)[0], 255);
        assert_eq!(gray.get_pixel(1, 0)[0], 128);
        assert_eq!(gray.get_pixel(2, 0)[0], 0);
        let (red, green, blue) = (
            gray.get_pixel(3, 0)[0],
            gray.get_pixel(4, 0)[0],
            gray.get_pixel(5, 0)[0],
        );
        assert!(green > red && red > blue);
    }
}
