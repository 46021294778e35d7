//! Watermark processor: the full tiling pipeline.
//!
//! 1. Rotate the source (canvas expanded) and convert it to RGBA.
//! 2. Resolve a font and measure the text.
//! 3. Render one tile patch, rotate it, and stamp it on a transparent layer
//!    at every grid position.
//! 4. Blend the layer over the image and flatten to opaque RGB.
//!
//! # Example
//!
//! ```ignore
//! use tilemark::config::WatermarkConfig;
//! use tilemark::watermark::apply_watermark;
//!
//! let source = image::open("id_card.jpg")?;
//! let output = apply_watermark(source, "SAMPLE", &WatermarkConfig::default())?;
//! assert!(!output.font_fallback || output.font_path.is_none());
//! ```

use super::compositor::{flatten, WatermarkLayer};
use super::font::{missing_glyphs, resolve_font, FontResolution};
use super::position::{calculate_tiled_positions, ImageDimensions, TileGrid};
use super::rotate::{rotate_expand, rotate_source, rotated_dimensions};
use super::text_renderer::{
    measure_text, parse_hex_color, patch_dimensions, render_text, TextRenderOptions,
};
use crate::config::WatermarkConfig;
use crate::error::WatermarkError;
use image::{DynamicImage, GenericImageView, RgbImage};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Result of a successful watermarking run.
#[derive(Debug, Clone)]
pub struct WatermarkOutput {
    /// Opaque watermarked image, same size as the (rotated) source.
    pub image: RgbImage,
    /// True when no listed font was usable and the bitmap font was used.
    pub font_fallback: bool,
    /// Font file the text was set in, if one was found.
    pub font_path: Option<PathBuf>,
    /// Font size in pixels.
    pub font_size: u32,
    /// Number of tiles stamped.
    pub tile_count: usize,
}

/// Reject sources above the configured pixel budget.
pub fn check_source_dimensions(
    width: u32,
    height: u32,
    max_pixels: u64,
) -> Result<(), WatermarkError> {
    let pixels = width as u64 * height as u64;
    if pixels > max_pixels {
        return Err(WatermarkError::SourceTooLarge {
            width,
            height,
            max_pixels,
        });
    }
    Ok(())
}

/// Reject tile patches whose unrotated or rotated canvas exceeds the pixel budget.
pub fn check_tile_dimensions(
    patch_width: u32,
    patch_height: u32,
    rotation_degrees: f32,
    max_pixels: u64,
) -> Result<(), WatermarkError> {
    let (rotated_width, rotated_height) =
        rotated_dimensions(patch_width, patch_height, rotation_degrees);
    let largest = (patch_width as u64 * patch_height as u64)
        .max(rotated_width as u64 * rotated_height as u64);
    if largest > max_pixels {
        return Err(WatermarkError::RenderError(format!(
            "Watermark tile {}x{} needs {} pixels, limit is {}",
            patch_width, patch_height, largest, max_pixels
        )));
    }
    Ok(())
}

/// Tile `text` across `source`.
///
/// The source is consumed. `config.text` is ignored in favour of `text`.
pub fn apply_watermark(
    source: DynamicImage,
    text: &str,
    config: &WatermarkConfig,
) -> Result<WatermarkOutput, WatermarkError> {
    if text.is_empty() {
        return Err(WatermarkError::EmptyText);
    }
    config.validate().map_err(WatermarkError::Config)?;
    let color = parse_hex_color(&config.fill_color)?;

    let (source_width, source_height) = source.dimensions();
    check_source_dimensions(source_width, source_height, config.max_source_pixels)?;

    let rotated = rotate_source(source, config.pre_rotate_degrees);
    let mut working = rotated.into_rgba8();
    let (width, height) = working.dimensions();
    debug!(
        source_width,
        source_height,
        width,
        height,
        pre_rotate_degrees = config.pre_rotate_degrees,
        "Prepared working image"
    );

    let font_size = config.font_size_for(width, height);
    let resolution = resolve_font(&config.font_paths);
    if let FontResolution::Located { path, font } = &resolution {
        let missing = missing_glyphs(font, text);
        if !missing.is_empty() {
            warn!(
                path = %path.display(),
                missing = %missing.iter().collect::<String>(),
                "Font has no glyphs for some characters"
            );
        }
    }

    let font = resolution.font();
    let metrics = measure_text(font, text, font_size as f32)?;
    let (patch_width, patch_height) = patch_dimensions(&metrics, config.tile_margin)?;
    check_tile_dimensions(
        patch_width,
        patch_height,
        config.tile_rotation_degrees,
        config.max_source_pixels,
    )?;

    let patch = render_text(
        font,
        &TextRenderOptions {
            text: text.to_string(),
            font_size: font_size as f32,
            color,
            margin: config.tile_margin,
        },
    )?;
    let tile = rotate_expand(&patch, config.tile_rotation_degrees);

    let grid = TileGrid::new(
        metrics.width,
        metrics.height,
        config.horizontal_spacing,
        config.vertical_spacing,
    );
    let positions = calculate_tiled_positions(&ImageDimensions { width, height }, &grid);
    debug!(
        font_size,
        text_width = metrics.width,
        text_height = metrics.height,
        step_x = grid.step_x,
        step_y = grid.step_y,
        tiles = positions.len(),
        "Tiling watermark"
    );

    let mut layer = WatermarkLayer::new(width, height);
    layer.stamp_all(&tile, &positions);
    layer.composite_onto(&mut working);

    Ok(WatermarkOutput {
        image: flatten(working),
        font_fallback: resolution.is_fallback(),
        font_path: resolution.path().map(|p| p.to_path_buf()),
        font_size,
        tile_count: layer.stamped(),
    })
}
