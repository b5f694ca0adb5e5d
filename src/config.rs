use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;

use crate::error::LocatorError;
use crate::geometry::Rect;
use crate::kernel::HsvRange;
use crate::select::{AreaThresholds, ZoneThresholds};

const DEFAULT_FRAME_WIDTH: u32 = 864;
const DEFAULT_FRAME_HEIGHT: u32 = 480;
const DEFAULT_HSV_MIN: [u8; 3] = [10, 127, 80];
const DEFAULT_HSV_MAX: [u8; 3] = [30, 255, 255];
const MAX_HUE: u8 = 179;

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct LocatorConfigFile {
    frame: Option<FrameConfigFile>,
    color: Option<ColorConfigFile>,
    areas: Option<AreaConfigFile>,
    zones: Option<ZoneConfigFile>,
    search_area: Option<SearchAreaConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct FrameConfigFile {
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct ColorConfigFile {
    hsv_min: Option<[u8; 3]>,
    hsv_max: Option<[u8; 3]>,
}

#[derive(Debug, Deserialize, Default)]
struct AreaConfigFile {
    selected_min: Option<f64>,
    candidate_min: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
struct ZoneConfigFile {
    center_min: Option<f64>,
    center_max: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchAreaConfigFile {
    Absolute {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    Fractional {
        from: [f64; 2],
        to: [f64; 2],
    },
}

/// Locator settings: frame geometry, color range and decision thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatorConfig {
    /// Size the working buffers are allocated for.
    pub frame_width: u32,
    pub frame_height: u32,
    pub color_range: HsvRange,
    pub areas: AreaThresholds,
    pub zones: ZoneThresholds,
    pub search_area: Option<Rect>,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            frame_width: DEFAULT_FRAME_WIDTH,
            frame_height: DEFAULT_FRAME_HEIGHT,
            color_range: HsvRange::new(DEFAULT_HSV_MIN, DEFAULT_HSV_MAX),
            areas: AreaThresholds::default(),
            zones: ZoneThresholds::default(),
            search_area: None,
        }
    }
}

impl LocatorConfig {
    /// Defaults, overlaid by the file named in `GOLD_LOCATOR_CONFIG` (if any),
    /// overlaid by `GOLD_LOCATOR_*` environment variables.
    pub fn load() -> Result<Self> {
        let file_cfg = match std::env::var("GOLD_LOCATOR_CONFIG").ok().as_deref() {
            Some(path) if !path.trim().is_empty() => Some(read_config_file(Path::new(path))?),
            _ => None,
        };
        Self::build(file_cfg.unwrap_or_default())
    }

    /// Like [`LocatorConfig::load`], with an explicit file path.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::build(read_config_file(path)?)
    }

    fn build(file: LocatorConfigFile) -> Result<Self> {
        let mut cfg = Self::from_file(file);
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: LocatorConfigFile) -> Self {
        let defaults = Self::default();

        let frame = file.frame.unwrap_or_default();
        let frame_width = frame.width.unwrap_or(defaults.frame_width);
        let frame_height = frame.height.unwrap_or(defaults.frame_height);

        let color = file.color.unwrap_or_default();
        let color_range = HsvRange::new(
            color.hsv_min.unwrap_or(DEFAULT_HSV_MIN),
            color.hsv_max.unwrap_or(DEFAULT_HSV_MAX),
        );

        let areas = file.areas.unwrap_or_default();
        let mut thresholds = areas
            .selected_min
            .map(AreaThresholds::from_selected_min)
            .unwrap_or(defaults.areas);
        if let Some(candidate_min) = areas.candidate_min {
            thresholds.candidate_min = candidate_min;
        }

        let zones = file.zones.unwrap_or_default();
        let zones = ZoneThresholds {
            center_min: zones.center_min.unwrap_or(defaults.zones.center_min),
            center_max: zones.center_max.unwrap_or(defaults.zones.center_max),
        };

        let search_area = file.search_area.map(|area| match area {
            SearchAreaConfigFile::Absolute {
                x,
                y,
                width,
                height,
            } => Rect::new(x, y, width, height),
            SearchAreaConfigFile::Fractional { from, to } => Rect::from_fractions(
                frame_width,
                frame_height,
                (from[0], from[1]),
                (to[0], to[1]),
            ),
        });

        Self {
            frame_width,
            frame_height,
            color_range,
            areas: thresholds,
            zones,
            search_area,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(value) = std::env::var("GOLD_LOCATOR_SELECTED_MIN_AREA") {
            let selected_min: f64 = value
                .trim()
                .parse()
                .map_err(|_| anyhow!("GOLD_LOCATOR_SELECTED_MIN_AREA must be a number"))?;
            self.areas = AreaThresholds::from_selected_min(selected_min);
        }
        if let Ok(value) = std::env::var("GOLD_LOCATOR_CANDIDATE_MIN_AREA") {
            self.areas.candidate_min = value
                .trim()
                .parse()
                .map_err(|_| anyhow!("GOLD_LOCATOR_CANDIDATE_MIN_AREA must be a number"))?;
        }
        if let Ok(value) = std::env::var("GOLD_LOCATOR_HSV_MIN") {
            self.color_range.min = parse_triple("GOLD_LOCATOR_HSV_MIN", &value)?;
        }
        if let Ok(value) = std::env::var("GOLD_LOCATOR_HSV_MAX") {
            self.color_range.max = parse_triple("GOLD_LOCATOR_HSV_MAX", &value)?;
        }
        if let Ok(value) = std::env::var("GOLD_LOCATOR_SEARCH_AREA") {
            if !value.trim().is_empty() {
                self.search_area = Some(parse_rect("GOLD_LOCATOR_SEARCH_AREA", &value)?);
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> std::result::Result<(), LocatorError> {
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(LocatorError::Config("frame size must be non-zero".into()));
        }
        let range = &self.color_range;
        if (0..3).any(|c| range.min[c] > range.max[c]) {
            return Err(LocatorError::Config(format!(
                "hsv_min {:?} exceeds hsv_max {:?}",
                range.min, range.max
            )));
        }
        if range.max[0] > MAX_HUE {
            return Err(LocatorError::Config(format!(
                "hue is measured in half-degrees and cannot exceed {}",
                MAX_HUE
            )));
        }
        if !(self.areas.selected_min > 0.0) {
            return Err(LocatorError::Config(
                "selected minimum area must be positive".into(),
            ));
        }
        if !(0.0..=self.areas.selected_min).contains(&self.areas.candidate_min) {
            return Err(LocatorError::Config(
                "candidate minimum area must be between 0 and the selected minimum area".into(),
            ));
        }
        let zones = &self.zones;
        if !(0.0 <= zones.center_min && zones.center_min <= zones.center_max && zones.center_max <= 1.0)
        {
            return Err(LocatorError::Config(format!(
                "zone split points must satisfy 0 <= {} <= {} <= 1",
                zones.center_min, zones.center_max
            )));
        }
        if let Some(area) = &self.search_area {
            if area.is_empty() {
                return Err(LocatorError::Config(format!(
                    "search area {} has no extent",
                    area
                )));
            }
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<LocatorConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let cfg = if is_toml {
        toml::from_str(&raw).map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    } else {
        serde_json::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    };
    Ok(cfg)
}

fn split_csv(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .collect()
}

fn parse_triple(name: &str, value: &str) -> Result<[u8; 3]> {
    let parts = split_csv(value);
    if parts.len() != 3 {
        return Err(anyhow!("{} must be three comma-separated values", name));
    }
    let mut out = [0u8; 3];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .map_err(|_| anyhow!("{} entries must be integers in 0..=255", name))?;
    }
    Ok(out)
}

fn parse_rect(name: &str, value: &str) -> Result<Rect> {
    let parts = split_csv(value);
    if parts.len() != 4 {
        return Err(anyhow!("{} must be x,y,width,height", name));
    }
    let mut out = [0i32; 4];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .map_err(|_| anyhow!("{} entries must be integers", name))?;
    }
    Ok(Rect::new(out[0], out[1], out[2], out[3]))
}
