//! Text watermark rendering.
//!
//! Renders the watermark text onto a transparent RGBA patch that the tiler
//! stamps across the image.
//!
//! # Features
//!
//! - Hex color parsing (#RGB, #RRGGBB and #RRGGBBAA formats)
//! - Outline fonts via `ab_glyph`, with kerning
//! - Built-in bitmap font when no outline font is available
//!
//! # Example
//!
//! ```ignore
//! use tilemark::watermark::font::resolve_font;
//! use tilemark::watermark::text_renderer::{render_text, parse_hex_color, TextRenderOptions};
//!
//! let resolution = resolve_font(&config.font_paths);
//! let options = TextRenderOptions {
//!     text: "SAMPLE".to_string(),
//!     font_size: 24.0,
//!     color: parse_hex_color("#FF000080").unwrap(),
//!     margin: 10,
//! };
//!
//! let patch = render_text(resolution.font(), &options).unwrap();
//! ```

use super::font::{bitmap_glyph, bitmap_scale, WatermarkFont, BITMAP_GLYPH_SIZE};
use crate::error::WatermarkError;
use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};

/// Parsed RGBA color from hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    fn to_rgba(self, coverage: f32) -> Rgba<u8> {
        let alpha = (coverage.clamp(0.0, 1.0) * self.a as f32).round() as u8;
        Rgba([self.r, self.g, self.b, alpha])
    }
}

/// Options for text rendering.
#[derive(Debug, Clone)]
pub struct TextRenderOptions {
    /// The text to render.
    pub text: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Text color, alpha included.
    pub color: Color,
    /// Transparent border around the text in pixels.
    pub margin: u32,
}

/// Bounding box of rendered text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Advance width in pixels.
    pub width: u32,
    /// Line height (ascent - descent) in pixels.
    pub height: u32,
    /// Distance from the top of the box to the baseline.
    pub ascent: f32,
}

/// Parse a hex color string into RGBA components.
///
/// Supports #RGB, #RRGGBB and #RRGGBBAA. Colors without an alpha component
/// are opaque.
///
/// # Examples
///
/// ```ignore
/// let white = parse_hex_color("#FFF").unwrap();
/// assert_eq!(white, Color::rgb(255, 255, 255));
///
/// let red = parse_hex_color("#FF000080").unwrap();
/// assert_eq!(red, Color::new(255, 0, 0, 128));
/// ```
pub fn parse_hex_color(hex: &str) -> Result<Color, WatermarkError> {
    let hex = hex
        .strip_prefix('#')
        .ok_or_else(|| WatermarkError::Config("Color must start with '#'".to_string()))?;

    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(WatermarkError::Config(format!(
            "Color contains invalid hex digits: '#{}'",
            hex
        )));
    }

    let component = |range: std::ops::Range<usize>| -> Result<u8, WatermarkError> {
        u8::from_str_radix(&hex[range], 16)
            .map_err(|_| WatermarkError::Config("Invalid hex digit".to_string()))
    };

    match hex.len() {
        3 => {
            // #RGB: each digit doubled, 0xF -> 0xFF
            Ok(Color::rgb(
                component(0..1)? * 17,
                component(1..2)? * 17,
                component(2..3)? * 17,
            ))
        }
        6 => Ok(Color::rgb(component(0..2)?, component(2..4)?, component(4..6)?)),
        8 => Ok(Color::new(
            component(0..2)?,
            component(2..4)?,
            component(4..6)?,
            component(6..8)?,
        )),
        _ => Err(WatermarkError::Config(format!(
            "Color must be #RGB, #RRGGBB or #RRGGBBAA format, got {} characters",
            hex.len()
        ))),
    }
}

/// Calculate the bounding box of `text` set in `font` at `font_size`.
///
/// The result only depends on its inputs, so repeated calls agree.
pub fn measure_text(
    font: WatermarkFont<'_>,
    text: &str,
    font_size: f32,
) -> Result<TextMetrics, WatermarkError> {
    if text.is_empty() {
        return Err(WatermarkError::EmptyText);
    }

    let metrics = match font {
        WatermarkFont::Outline(font) => measure_outline(font, text, font_size),
        WatermarkFont::Bitmap => {
            let too_large = || {
                WatermarkError::RenderError(format!(
                    "Text of {} characters at size {} is too large to render",
                    text.chars().count(),
                    font_size
                ))
            };
            let glyph = BITMAP_GLYPH_SIZE
                .checked_mul(bitmap_scale(font_size))
                .ok_or_else(too_large)?;
            let count = u32::try_from(text.chars().count()).map_err(|_| too_large())?;
            TextMetrics {
                width: glyph.checked_mul(count).ok_or_else(too_large)?,
                height: glyph,
                ascent: glyph as f32,
            }
        }
    };

    if metrics.width == 0 || metrics.height == 0 {
        return Err(WatermarkError::RenderError(format!(
            "Text measures {}x{} at size {}",
            metrics.width, metrics.height, font_size
        )));
    }

    Ok(metrics)
}

fn measure_outline(font: &FontVec, text: &str, font_size: f32) -> TextMetrics {
    let scaled_font = font.as_scaled(PxScale::from(font_size));

    let mut width = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for c in text.chars() {
        let glyph_id = scaled_font.glyph_id(c);

        if let Some(prev) = prev_glyph {
            width += scaled_font.kern(prev, glyph_id);
        }

        width += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    let ascent = scaled_font.ascent();
    let height = ascent - scaled_font.descent();

    TextMetrics {
        width: width.max(0.0).ceil() as u32,
        height: height.max(0.0).ceil() as u32,
        ascent,
    }
}

/// Size of the patch holding `metrics` with `margin` on every side.
pub fn patch_dimensions(metrics: &TextMetrics, margin: u32) -> Result<(u32, u32), WatermarkError> {
    let grow = |side: u32| margin.checked_mul(2).and_then(|m| side.checked_add(m));
    match (grow(metrics.width), grow(metrics.height)) {
        (Some(width), Some(height)) => Ok((width, height)),
        _ => Err(WatermarkError::RenderError(format!(
            "Patch for {}x{} text with margin {} overflows",
            metrics.width, metrics.height, margin
        ))),
    }
}

/// Render text to a transparent RGBA patch.
///
/// The patch is `(width + 2 * margin) x (height + 2 * margin)` with the text
/// box's top-left corner at `(margin, margin)`.
pub fn render_text(
    font: WatermarkFont<'_>,
    options: &TextRenderOptions,
) -> Result<RgbaImage, WatermarkError> {
    let metrics = measure_text(font, &options.text, options.font_size)?;

    let (canvas_width, canvas_height) = patch_dimensions(&metrics, options.margin)?;
    let mut image = RgbaImage::new(canvas_width, canvas_height);

    match font {
        WatermarkFont::Outline(font) => draw_outline(&mut image, font, options, &metrics),
        WatermarkFont::Bitmap => draw_bitmap(&mut image, options),
    }

    Ok(image)
}

fn draw_outline(
    image: &mut RgbaImage,
    font: &FontVec,
    options: &TextRenderOptions,
    metrics: &TextMetrics,
) {
    let scale = PxScale::from(options.font_size);
    let scaled_font = font.as_scaled(scale);
    let (canvas_width, canvas_height) = image.dimensions();

    let baseline_y = options.margin as f32 + metrics.ascent;
    let mut cursor_x = options.margin as f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for c in options.text.chars() {
        let glyph_id = scaled_font.glyph_id(c);

        if let Some(prev) = prev_glyph {
            cursor_x += scaled_font.kern(prev, glyph_id);
        }

        let glyph = glyph_id.with_scale_and_position(scale, ab_glyph::point(cursor_x, baseline_y));

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();

            outlined.draw(|px, py, coverage| {
                let x = px as i32 + bounds.min.x as i32;
                let y = py as i32 + bounds.min.y as i32;

                if x >= 0 && y >= 0 && x < canvas_width as i32 && y < canvas_height as i32 {
                    let pixel = options.color.to_rgba(coverage);
                    let existing = image.get_pixel(x as u32, y as u32);
                    let blended = super::compositor::blend_pixels(*existing, pixel);
                    image.put_pixel(x as u32, y as u32, blended);
                }
            });
        }

        cursor_x += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }
}

fn draw_bitmap(image: &mut RgbaImage, options: &TextRenderOptions) {
    let scale = bitmap_scale(options.font_size);
    let advance = BITMAP_GLYPH_SIZE * scale;
    let pixel = options.color.to_rgba(1.0);

    for (index, c) in options.text.chars().enumerate() {
        let origin_x = options.margin + index as u32 * advance;

        for (row, bits) in bitmap_glyph(c).iter().enumerate() {
            for col in 0..BITMAP_GLYPH_SIZE {
                if (bits >> col) & 1 == 0 {
                    continue;
                }
                let base_x = origin_x + col * scale;
                let base_y = options.margin + row as u32 * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        image.put_pixel(base_x + dx, base_y + dy, pixel);
                    }
                }
            }
        }
    }
}
