//! Screenshot capture to disk and optional annotation of resolved targets

use crate::browser::PageDriver;
use crate::error::{FleroviumError, Result};
use crate::prediction::TargetCoordinate;
use chrono::Utc;
use image::Rgba;
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

const RING_RADIUS: i32 = 15;
const DOT_RADIUS: i32 = 3;
const MARK_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Capture the viewport to `<dir>/<host>-<epoch millis>.png`.
///
/// The directory is created when missing. Files are never cleaned up.
pub fn capture_to(driver: &dyn PageDriver, dir: &Path) -> Result<PathBuf> {
    let png = driver.capture_screenshot()?;
    let host = host_label(&driver.current_url()?);

    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}-{}.png", host, Utc::now().timestamp_millis()));
    fs::write(&path, png)?;

    log::debug!("Saved screenshot to {}", path.display());
    Ok(path)
}

/// Host part of a URL for file naming; `page` when there is none
pub fn host_label(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .filter(|host| !host.is_empty())
        .unwrap_or_else(|| "page".to_string())
}

/// Write a copy of the screenshot with a ring around `point`, named `<stem>-marked.png`
pub fn annotate(path: &Path, point: TargetCoordinate) -> Result<PathBuf> {
    if !point.is_finite() {
        return Err(FleroviumError::InvalidCoordinate(format!("cannot annotate {}", point)));
    }

    let mut canvas = image::open(path)
        .map_err(|e| FleroviumError::ScreenshotFailed(format!("Failed to open {}: {}", path.display(), e)))?
        .to_rgba8();

    let center = (point.x.round() as i32, point.y.round() as i32);
    draw_hollow_circle_mut(&mut canvas, center, RING_RADIUS, MARK_COLOR);
    draw_filled_circle_mut(&mut canvas, center, DOT_RADIUS, MARK_COLOR);

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("screenshot");
    let output = path.with_file_name(format!("{}-marked.png", stem));

    canvas
        .save(&output)
        .map_err(|e| FleroviumError::ScreenshotFailed(format!("Failed to save {}: {}", output.display(), e)))?;

    Ok(output)
}
