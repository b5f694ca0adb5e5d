//! Batch scoring of labeled still images.
//!
//! Test images carry their expected zone as the last `_`-separated token of
//! the file stem (`field_07_center.jpg`). Each image is resized to the
//! locator's frame size, located once, and compared against that label.

use anyhow::{anyhow, Context, Result};
use image::imageops::FilterType;
use image::{GrayImage, RgbaImage};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::detection::{Detection, Zone};
use crate::frame::to_gray;
use crate::kernel::VisionKernel;
use crate::locator::LocatorSession;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// One labeled image on disk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LabeledImage {
    pub path: PathBuf,
    pub expected: Zone,
}

impl LabeledImage {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Expected zone encoded in a file name, if any.
pub fn expected_zone(path: &Path) -> Option<Zone> {
    let stem = path.file_stem()?.to_str()?;
    // Only the part before the first dot counts, so `a_left.v2.jpg` is LEFT.
    let stem = stem.split('.').next()?;
    stem.rsplit('_').next()?.parse().ok()
}

/// Labeled images in `dir`, sorted by file name. Files without a zone label
/// are skipped with a warning.
pub fn list_labeled_images(dir: &Path) -> Result<Vec<LabeledImage>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list image directory {}", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_image = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)));
        if path.is_file() && is_image {
            paths.push(path);
        }
    }
    paths.sort();

    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        match expected_zone(&path) {
            Some(expected) => images.push(LabeledImage { path, expected }),
            None => log::warn!("skipping {}: no zone label in file name", path.display()),
        }
    }
    Ok(images)
}

/// Load an image file as an RGBA + grayscale pair of the given size.
pub fn load_frame(path: &Path, width: u32, height: u32) -> Result<(RgbaImage, GrayImage)> {
    let decoded = image::open(path)
        .with_context(|| format!("failed to decode image {}", path.display()))?;
    let color = image::imageops::resize(&decoded.to_rgba8(), width, height, FilterType::Triangle);
    let gray = to_gray(&color);
    Ok((color, gray))
}

/// Outcome for one image.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoreEntry {
    pub image: LabeledImage,
    pub found: Zone,
    pub detection: Option<Detection>,
}

impl ScoreEntry {
    pub fn passed(&self) -> bool {
        self.image.expected == self.found
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ScoreReport {
    pub entries: Vec<ScoreEntry>,
}

impl ScoreReport {
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn passed(&self) -> usize {
        self.entries.iter().filter(|e| e.passed()).count()
    }

    pub fn pass_rate(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        100.0 * self.passed() as f64 / self.total() as f64
    }

    /// Machine-readable report for archiving a scoring run.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize score report")
    }

    pub fn summary(&self) -> String {
        format!(
            "Test complete, {}/{} ({:.2}%) passed.",
            self.passed(),
            self.total(),
            self.pass_rate()
        )
    }
}

/// Fixed-width row used by the scoring table.
pub fn format_row(image: &str, expected: &str, found: &str, result: &str) -> String {
    format!("{:<40}{:<10}{:<10}{:<10}", image, expected, found, result)
}

/// Locate every image with `session`, calling `on_entry` after each one with
/// the session still holding that image's results.
pub fn score_images<K, F>(
    session: &mut LocatorSession<K>,
    images: &[LabeledImage],
    mut on_entry: F,
) -> Result<ScoreReport>
where
    K: VisionKernel,
    F: FnMut(&ScoreEntry, &LocatorSession<K>) -> Result<()>,
{
    let (width, height) = (session.config().frame_width, session.config().frame_height);
    let mut report = ScoreReport::default();
    for image in images {
        let (color, gray) = load_frame(&image.path, width, height)?;
        session
            .locate(&color, &gray)
            .map_err(|e| anyhow!("failed to locate in {}: {}", image.path.display(), e))?;
        let entry = ScoreEntry {
            image: image.clone(),
            found: session.current_zone(),
            detection: session.current_detection().copied(),
        };
        on_entry(&entry, session)?;
        report.entries.push(entry);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_comes_from_last_stem_token() {
        assert_eq!(expected_zone(Path::new("a/field_03_left.jpg")), Some(Zone::Left));
        assert_eq!(expected_zone(Path::new("CENTER.png")), Some(Zone::Center));
        assert_eq!(
            expected_zone(Path::new("run_2_Right.v2.jpeg")),
            Some(Zone::Right)
        );
        assert_eq!(
            expected_zone(Path::new("empty_unknown.jpg")),
            Some(Zone::Unknown)
        );
        assert_eq!(expected_zone(Path::new("field_03.jpg")), None);
    }

    #[test]
    fn report_summary_matches_table_footer() {
        let entry = |expected, found| ScoreEntry {
            image: LabeledImage {
                path: PathBuf::from("x_left.jpg"),
                expected,
            },
            found,
            detection: None,
        };
        let report = ScoreReport {
            entries: vec![
                entry(Zone::Left, Zone::Left),
                entry(Zone::Left, Zone::Center),
                entry(Zone::Right, Zone::Right),
            ],
        };
        assert_eq!(report.passed(), 2);
        assert_eq!(report.summary(), "Test complete, 2/3 (66.67%) passed.");
        assert_eq!(ScoreReport::default().pass_rate(), 0.0);
    }

    #[test]
    fn rows_are_fixed_width() {
        let row = format_row("img_left.jpg", "LEFT", "LEFT", "PASS");
        assert_eq!(row.len(), 70);
        assert!(row.starts_with("img_left.jpg"));
        assert_eq!(&row[40..44], "LEFT");
    }
}
