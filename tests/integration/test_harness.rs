// Shared fixtures for integration tests

use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};
use tilemark::config::WatermarkConfig;

/// Write a light-grey document-like image with a dark border.
pub fn write_document(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let image = RgbImage::from_fn(width, height, |x, y| {
        if x < 4 || y < 4 || x + 4 >= width || y + 4 >= height {
            Rgb([30, 30, 30])
        } else {
            Rgb([235, 235, 235])
        }
    });
    image.save(&path).expect("Failed to write fixture image");
    path
}

/// Config that skips the system font search.
pub fn bitmap_config(text: &str) -> WatermarkConfig {
    WatermarkConfig {
        text: text.to_string(),
        font_paths: Vec::new(),
        ..Default::default()
    }
}

/// Latin outline font checked in under `tests/fixtures/` (DejaVu Sans Mono).
pub fn fixture_font() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/DejaVuSansMono.ttf")
}
