//! Font resolution for text watermarks.
//!
//! Fonts are searched in a fixed order; the first file that exists and parses
//! wins. When the list is exhausted the run continues with a built-in 8x8
//! bitmap font, reported as [`FontResolution::Fallback`] rather than an error.

use ab_glyph::{Font, FontVec};
use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Side length in pixels of a bitmap glyph at scale 1.
pub const BITMAP_GLYPH_SIZE: u32 = 8;

/// Outcome of walking the font search list.
pub enum FontResolution {
    /// A font file from the search list was loaded.
    Located { path: PathBuf, font: FontVec },
    /// No listed font was usable; the built-in bitmap font is used.
    Fallback,
}

impl std::fmt::Debug for FontResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Located { path, .. } => f
                .debug_struct("Located")
                .field("path", path)
                .finish_non_exhaustive(),
            Self::Fallback => f.write_str("Fallback"),
        }
    }
}

impl FontResolution {
    /// Borrow the resolved font for measuring and rendering.
    pub fn font(&self) -> WatermarkFont<'_> {
        match self {
            Self::Located { font, .. } => WatermarkFont::Outline(font),
            Self::Fallback => WatermarkFont::Bitmap,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback)
    }

    /// Path of the located font, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Located { path, .. } => Some(path),
            Self::Fallback => None,
        }
    }
}

/// A font ready for text measurement and rendering.
#[derive(Clone, Copy)]
pub enum WatermarkFont<'a> {
    /// Scalable TrueType/OpenType outlines.
    Outline(&'a FontVec),
    /// Built-in 8x8 bitmap glyphs, scaled by whole pixels.
    Bitmap,
}

impl std::fmt::Debug for WatermarkFont<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Outline(_) => f.write_str("Outline"),
            Self::Bitmap => f.write_str("Bitmap"),
        }
    }
}

/// Walk `paths` in order and load the first usable font.
pub fn resolve_font(paths: &[PathBuf]) -> FontResolution {
    for path in paths {
        if !path.exists() {
            debug!(path = %path.display(), "Font candidate not present");
            continue;
        }

        match load_font(path) {
            Ok(font) => {
                debug!(path = %path.display(), "Using font");
                return FontResolution::Located {
                    path: path.clone(),
                    font,
                };
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable font");
            }
        }
    }

    warn!(
        candidates = paths.len(),
        "No usable font found, falling back to built-in bitmap font"
    );
    FontResolution::Fallback
}

/// Load a TrueType/OpenType font file. Collections use their first face.
pub fn load_font(path: &Path) -> Result<FontVec, String> {
    let data = std::fs::read(path).map_err(|e| format!("Failed to read font: {}", e))?;
    FontVec::try_from_vec_and_index(data, 0).map_err(|e| format!("Invalid font data: {}", e))
}

/// Distinct characters of `text` the font has no glyph for, in order of
/// first appearance (whitespace ignored).
pub fn missing_glyphs(font: &FontVec, text: &str) -> Vec<char> {
    let mut missing = Vec::new();
    for c in text.chars() {
        if !c.is_whitespace() && font.glyph_id(c).0 == 0 && !missing.contains(&c) {
            missing.push(c);
        }
    }
    missing
}

/// Bitmap rows for `c`; unknown characters render as '?'.
///
/// Bit `n` of each row is column `n`, counted from the left.
pub fn bitmap_glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Integer upscale applied to bitmap glyphs for a requested pixel size.
pub fn bitmap_scale(font_size: f32) -> u32 {
    ((font_size / BITMAP_GLYPH_SIZE as f32).round() as u32).max(1)
}
