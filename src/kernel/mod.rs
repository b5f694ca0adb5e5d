//! Vision kernel: the image-processing primitives behind segmentation and
//! blob extraction.

mod backend;
mod backends;

pub use backend::{HsvImage, HsvRange, VisionKernel};
pub use backends::cpu::rgb_to_hsv;
pub use backends::ImageprocKernel;
