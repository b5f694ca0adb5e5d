//! Blob extraction from a binary mask.

use anyhow::Result;
use image::GrayImage;

use crate::geometry::{Contour, Rect};
use crate::kernel::VisionKernel;

/// One traced border with its enclosed area and bounding box.
#[derive(Clone, Debug, PartialEq)]
pub struct Blob {
    pub contour: Contour,
    pub area: f64,
    pub bounding_box: Rect,
}

/// Trace every border in `mask` and yield them as blobs.
///
/// Area and bounding box are computed as the iterator is consumed. Nothing is
/// filtered here: hole borders and single-pixel specks are yielded too.
pub fn extract_blobs<'k, K: VisionKernel + ?Sized>(
    kernel: &'k K,
    mask: &GrayImage,
) -> Result<impl Iterator<Item = Blob> + 'k> {
    let contours = kernel.find_contours(mask)?;
    Ok(contours.into_iter().map(move |contour| Blob {
        area: kernel.contour_area(&contour),
        bounding_box: kernel.bounding_rect(&contour),
        contour,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BorderKind;
    use crate::kernel::ImageprocKernel;
    use image::Luma;

    #[test]
    fn all_zero_mask_yields_nothing() -> Result<()> {
        let kernel = ImageprocKernel::new();
        let blobs: Vec<Blob> = extract_blobs(&kernel, &GrayImage::new(32, 32))?.collect();
        assert!(blobs.is_empty());
        Ok(())
    }

    #[test]
    fn separate_regions_become_separate_blobs() -> Result<()> {
        let kernel = ImageprocKernel::new();
        let mut mask = GrayImage::new(40, 20);
        for y in 2..8 {
            for x in 2..12 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        mask.put_pixel(30, 15, Luma([255]));

        let blobs: Vec<Blob> = extract_blobs(&kernel, &mask)?.collect();
        assert_eq!(blobs.len(), 2);

        assert_eq!(blobs[0].bounding_box, Rect::new(2, 2, 10, 6));
        assert_eq!(blobs[0].area, 45.0);
        assert_eq!(blobs[0].contour.kind, BorderKind::Outer);

        // A lone pixel is still a blob, just one without enclosed area.
        assert_eq!(blobs[1].bounding_box, Rect::new(30, 15, 1, 1));
        assert_eq!(blobs[1].area, 0.0);
        Ok(())
    }
}
