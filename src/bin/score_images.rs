//! score_images - run the locator over a directory of labeled stills
//!
//! Each image's expected zone is the last `_` token of its file name. Prints
//! one row per image and a pass rate, optionally writing annotated copies.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use image::DynamicImage;
use std::fs;
use std::path::{Path, PathBuf};

use gold_locator::scoring::{self, format_row};
use gold_locator::{GoldMineralLocator, ImageprocKernel, LocatorConfig, Rect};

/// Default band: full width, 10% to 40% of the frame height.
const DEFAULT_SEARCH_FROM: (f64, f64) = (0.0, 0.1);
const DEFAULT_SEARCH_TO: (f64, f64) = (1.0, 0.4);

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Directory of labeled images (jpg, jpeg, png).
    #[arg(default_value = "testImages")]
    dir: PathBuf,
    /// Directory to write annotated images into.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Write a JSON report of every result to this path.
    #[arg(long)]
    report: Option<PathBuf>,
    /// Config file (JSON or TOML). Falls back to GOLD_LOCATOR_CONFIG.
    #[arg(long, env = "GOLD_LOCATOR_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match args.config.as_deref() {
        Some(path) => LocatorConfig::load_from(path)?,
        None => LocatorConfig::load()?,
    };
    let search_area = config.search_area.unwrap_or_else(|| {
        Rect::from_fractions(
            config.frame_width,
            config.frame_height,
            DEFAULT_SEARCH_FROM,
            DEFAULT_SEARCH_TO,
        )
    });

    if let Some(out) = &args.out {
        fs::create_dir_all(out)
            .with_context(|| format!("failed to create output directory {}", out.display()))?;
    }

    let images = scoring::list_labeled_images(&args.dir)?;
    if images.is_empty() {
        return Err(anyhow!("no labeled images found in {}", args.dir.display()));
    }

    let mut session = GoldMineralLocator::new(config)
        .with_search_area(search_area)
        .open(ImageprocKernel::new())?;

    println!("Testing {} images from {}...", images.len(), args.dir.display());
    println!("{}", format_row("Image", "Expected", "Found", "Result"));
    let report = scoring::score_images(&mut session, &images, |entry, session| {
        println!(
            "{}",
            format_row(
                &entry.image.file_name(),
                entry.image.expected.as_str(),
                entry.found.as_str(),
                if entry.passed() { "PASS" } else { "FAIL" },
            )
        );
        if let (Some(out), Some(annotated)) = (&args.out, session.annotated_image()) {
            save_annotated(&out.join(entry.image.file_name()), annotated)?;
        }
        Ok(())
    })?;

    println!();
    println!("{}", report.summary());

    if let Some(path) = &args.report {
        fs::write(path, report.to_json()?)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        log::info!("wrote report to {}", path.display());
    }
    Ok(())
}

fn save_annotated(path: &Path, image: &image::RgbaImage) -> Result<()> {
    // JPEG has no alpha channel.
    DynamicImage::ImageRgba8(image.clone())
        .to_rgb8()
        .save(path)
        .with_context(|| format!("failed to write annotated image {}", path.display()))
}
