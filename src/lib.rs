//! Gold Mineral Locator
//!
//! Finds the gold (yellow) mineral in a camera frame and reports which of
//! three horizontal zones it sits in: LEFT, CENTER or RIGHT.
//!
//! # Pipeline
//!
//! Each call to [`LocatorSession::locate`] runs:
//!
//! 1. **Segmentation**: RGBA → HSV, restricted to the search area, then an
//!    inclusive HSV range test yields a binary mask.
//! 2. **Blob extraction**: contour tracing over the mask, with polygon area
//!    and bounding box per contour.
//! 3. **Selection**: the largest blob becomes the detection when it clears
//!    the area floor; other sizable blobs that do not overlap it are kept as
//!    candidates.
//! 4. **Classification**: the detection's horizontal center, relative to the
//!    search area, picks the zone.
//! 5. **Memory**: the last detection with a known zone survives frames that
//!    detect nothing.
//! 6. **Annotation**: an optional diagnostic overlay of the frame.
//!
//! # Module Structure
//!
//! - `kernel`: Vision primitives behind the `VisionKernel` trait (imageproc backend)
//! - `segment`, `blob`, `select`, `memory`, `annotate`: Pipeline stages
//! - `locator`: `GoldMineralLocator` and the per-frame `LocatorSession`
//! - `config`: File and environment configuration
//! - `scoring`: Batch scoring of labeled still images

pub mod annotate;
pub mod blob;
pub mod config;
pub mod detection;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod kernel;
pub mod locator;
pub mod memory;
pub mod scoring;
pub mod segment;
pub mod select;

pub use annotate::{Annotator, Label, Overlay, Placement};
pub use blob::{extract_blobs, Blob};
pub use config::LocatorConfig;
pub use detection::{Detection, Zone};
pub use error::{LocatorError, Result};
pub use frame::{to_gray, FramePair};
pub use geometry::{BorderKind, Contour, Point, Rect};
pub use kernel::{HsvImage, HsvRange, ImageprocKernel, VisionKernel};
pub use locator::{GoldMineralLocator, LocatorSession};
pub use memory::DetectionMemory;
pub use segment::{ColorSegmenter, SegmentBuffers};
pub use select::{AreaThresholds, Selection, Selector, ZoneThresholds};
