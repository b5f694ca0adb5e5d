//! The gold mineral locator: segmentation, blob selection, zone
//! classification and last-known memory behind one `locate` call.
//!
//! Construction is two-phase. [`GoldMineralLocator`] only holds
//! configuration; [`GoldMineralLocator::open`] checks that the vision kernel
//! is ready and allocates every working buffer, returning a
//! [`LocatorSession`] that processes frames.
//!
//! A session is single-threaded: `locate` takes `&mut self`, so concurrent
//! calls on one session need external synchronization. Use one session per
//! thread to locate in parallel.

use image::{GrayImage, RgbaImage};

use crate::annotate::{Annotator, Label, Overlay};
use crate::blob::{extract_blobs, Blob};
use crate::config::LocatorConfig;
use crate::detection::{Detection, Zone};
use crate::error::{LocatorError, Result};
use crate::frame::FramePair;
use crate::geometry::Rect;
use crate::kernel::VisionKernel;
use crate::memory::DetectionMemory;
use crate::segment::{ColorSegmenter, SegmentBuffers};
use crate::select::Selector;

/// Unopened locator: configuration and search area only.
#[derive(Debug, Clone)]
pub struct GoldMineralLocator {
    config: LocatorConfig,
    search_area: Option<Rect>,
    annotate: bool,
}

impl GoldMineralLocator {
    pub fn new(config: LocatorConfig) -> Self {
        Self {
            search_area: config.search_area,
            config,
            annotate: true,
        }
    }

    pub fn with_search_area(mut self, search_area: Rect) -> Self {
        self.search_area = Some(search_area);
        self
    }

    pub fn set_search_area(&mut self, search_area: Rect) {
        self.search_area = Some(search_area);
    }

    /// Skip the diagnostic overlay; sessions then report no annotated image.
    pub fn without_annotation(mut self) -> Self {
        self.annotate = false;
        self
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    pub fn search_area(&self) -> Option<Rect> {
        self.search_area
    }

    /// Validate the configuration, warm up `kernel` and allocate buffers.
    pub fn open<K: VisionKernel>(self, mut kernel: K) -> Result<LocatorSession<K>> {
        self.config.validate()?;
        if let Some(area) = &self.search_area {
            check_search_area_extent(area)?;
        }
        kernel
            .warm_up()
            .map_err(|e| LocatorError::Kernel(e.context("vision kernel is not ready")))?;

        let (width, height) = (self.config.frame_width, self.config.frame_height);
        log::info!(
            "locator session open: kernel={}, frame={}x{}, search_area={}",
            kernel.name(),
            width,
            height,
            self.search_area
                .map(|a| a.to_string())
                .unwrap_or_else(|| "unset".to_string())
        );

        Ok(LocatorSession {
            segmenter: ColorSegmenter::new(self.config.color_range),
            selector: Selector::new(self.config.areas, self.config.zones),
            buffers: SegmentBuffers::new(width, height),
            annotator: self.annotate.then(|| Annotator::new(width, height)),
            blobs: Vec::new(),
            current: None,
            candidates: Vec::new(),
            memory: DetectionMemory::new(),
            search_area: self.search_area,
            config: self.config,
            kernel,
        })
    }
}

/// An opened locator holding working buffers and per-frame state.
#[derive(Debug)]
pub struct LocatorSession<K: VisionKernel> {
    kernel: K,
    config: LocatorConfig,
    segmenter: ColorSegmenter,
    selector: Selector,
    search_area: Option<Rect>,
    buffers: SegmentBuffers,
    annotator: Option<Annotator>,
    blobs: Vec<Blob>,
    current: Option<Detection>,
    candidates: Vec<Rect>,
    memory: DetectionMemory,
}

impl<K: VisionKernel> LocatorSession<K> {
    /// Replace the search area. Takes effect on the next `locate`.
    pub fn set_search_area(&mut self, search_area: Rect) -> Result<()> {
        check_search_area_extent(&search_area)?;
        log::info!("search area set to {}", search_area);
        self.search_area = Some(search_area);
        Ok(())
    }

    pub fn search_area(&self) -> Option<Rect> {
        self.search_area
    }

    /// Run one detection pass over a frame pair.
    ///
    /// Returns `Ok(true)` when this frame produced a detection. A frame
    /// without one is `Ok(false)` and leaves the last-known detection as it
    /// was. Precondition violations are reported before any state changes.
    pub fn locate(&mut self, color: &RgbaImage, gray: &GrayImage) -> Result<bool> {
        let frame = FramePair::new(color, gray)?;
        let search_area = self.search_area.ok_or_else(|| {
            LocatorError::precondition("search area must be set before locating")
        })?;
        if search_area.clip_to(frame.width(), frame.height()).is_none() {
            return Err(LocatorError::precondition(format!(
                "search area {} lies outside the {}x{} frame",
                search_area,
                frame.width(),
                frame.height()
            )));
        }
        if frame.dimensions() != self.buffers.dimensions() {
            log::warn!(
                "frame is {}x{}, buffers were sized for {}x{}; reallocating",
                frame.width(),
                frame.height(),
                self.buffers.dimensions().0,
                self.buffers.dimensions().1
            );
        }

        let mask = self.segmenter.segment(
            &self.kernel,
            frame.color(),
            Some(&search_area),
            &mut self.buffers,
        )?;

        self.blobs.clear();
        self.blobs.extend(extract_blobs(&self.kernel, mask)?);
        log::trace!("traced {} blobs", self.blobs.len());

        let selection = self.selector.select(&self.blobs, &search_area);
        self.current = selection.detection;
        self.candidates = selection.candidates;
        self.memory.record(self.current.as_ref());

        if let Some(annotator) = self.annotator.as_mut() {
            annotator.render(
                frame.color(),
                frame.gray(),
                self.buffers.mask(),
                &Overlay {
                    search_area: Some(&search_area),
                    candidates: &self.candidates,
                    detection: self.current.as_ref(),
                },
            );
        }

        match &self.current {
            Some(d) => log::debug!(
                "located {} at {} (contour area {:.0}), {} candidates",
                d.zone,
                d.bounding_box,
                d.contour_area,
                self.candidates.len()
            ),
            None => log::debug!(
                "no detection, {} candidates, last known {}",
                self.candidates.len(),
                self.memory.zone()
            ),
        }

        Ok(self.current.is_some())
    }

    pub fn current_detection(&self) -> Option<&Detection> {
        self.current.as_ref()
    }

    pub fn current_zone(&self) -> Zone {
        self.current.map(|d| d.zone).unwrap_or_default()
    }

    pub fn current_bounding_box(&self) -> Option<Rect> {
        self.current.map(|d| d.bounding_box)
    }

    /// Contour area of the current detection, 0 when there is none.
    pub fn current_contour_area(&self) -> f64 {
        self.current.map(|d| d.contour_area).unwrap_or(0.0)
    }

    pub fn last_known_detection(&self) -> Option<&Detection> {
        self.memory.last()
    }

    pub fn last_known_zone(&self) -> Zone {
        self.memory.zone()
    }

    pub fn last_known_bounding_box(&self) -> Option<Rect> {
        self.memory.bounding_box()
    }

    pub fn last_known_contour_area(&self) -> f64 {
        self.memory.contour_area()
    }

    /// Bounding boxes of unselected blobs above the noise floor, in blob order.
    pub fn candidates(&self) -> &[Rect] {
        &self.candidates
    }

    /// Mask produced by the last `locate`.
    pub fn mask(&self) -> &GrayImage {
        self.buffers.mask()
    }

    pub fn annotated_image(&self) -> Option<&RgbaImage> {
        self.annotator.as_ref().map(|a| a.image())
    }

    pub fn labels(&self) -> &[Label] {
        self.annotator.as_ref().map(|a| a.labels()).unwrap_or(&[])
    }

    pub fn kernel_name(&self) -> &'static str {
        self.kernel.name()
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }
}

fn check_search_area_extent(area: &Rect) -> Result<()> {
    if area.is_empty() {
        return Err(LocatorError::precondition(format!(
            "search area {} must have positive width and height",
            area
        )));
    }
    Ok(())
}
