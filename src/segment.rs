//! Color segmentation: HSV conversion, search-area masking and range threshold.

use anyhow::Result;
use image::{GrayImage, Rgb, RgbaImage};

use crate::geometry::Rect;
use crate::kernel::{HsvImage, HsvRange, VisionKernel};

/// Working buffers for one frame size, reused across frames.
#[derive(Debug)]
pub struct SegmentBuffers {
    hsv: HsvImage,
    searched: HsvImage,
    mask: GrayImage,
}

impl SegmentBuffers {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            hsv: HsvImage::new(width, height),
            searched: HsvImage::new(width, height),
            mask: GrayImage::new(width, height),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.mask.dimensions()
    }

    pub fn mask(&self) -> &GrayImage {
        &self.mask
    }
}

/// Produces the binary mask of pixels whose HSV color lies in the target range.
#[derive(Clone, Copy, Debug)]
pub struct ColorSegmenter {
    range: HsvRange,
}

impl ColorSegmenter {
    pub fn new(range: HsvRange) -> Self {
        Self { range }
    }

    pub fn range(&self) -> &HsvRange {
        &self.range
    }

    /// Segment `color` into `buffers` and return the mask.
    ///
    /// With a search area, the HSV image is copied into a zeroed buffer only
    /// inside the (frame-clipped) rectangle before thresholding, so pixels
    /// outside it read as HSV black. Without one the whole frame is searched.
    pub fn segment<'b, K: VisionKernel + ?Sized>(
        &self,
        kernel: &K,
        color: &RgbaImage,
        search_area: Option<&Rect>,
        buffers: &'b mut SegmentBuffers,
    ) -> Result<&'b GrayImage> {
        let (width, height) = color.dimensions();
        if buffers.dimensions() != (width, height) {
            *buffers = SegmentBuffers::new(width, height);
        }

        kernel.convert_color_space(color, &mut buffers.hsv)?;

        let source = match search_area {
            Some(area) => {
                restrict_to(&buffers.hsv, area, &mut buffers.searched);
                &buffers.searched
            }
            None => &buffers.hsv,
        };

        kernel.threshold_range(source, &self.range, &mut buffers.mask)?;
        Ok(&buffers.mask)
    }
}

fn restrict_to(hsv: &HsvImage, area: &Rect, out: &mut HsvImage) {
    if out.dimensions() != hsv.dimensions() {
        *out = HsvImage::new(hsv.width(), hsv.height());
    } else {
        out.pixels_mut().for_each(|p| *p = Rgb([0, 0, 0]));
    }
    let Some(clipped) = area.clip_to(hsv.width(), hsv.height()) else {
        return;
    };
    for y in clipped.y..clipped.y + clipped.height {
        for x in clipped.x..clipped.x + clipped.width {
            let (x, y) = (x as u32, y as u32);
            out.put_pixel(x, y, *hsv.get_pixel(x, y));
        }
    }
}
