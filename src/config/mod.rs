//! Watermark configuration.
//!
//! Every knob of a watermarking run lives in [`WatermarkConfig`]. All fields
//! carry serde defaults, so a YAML file only needs the values it changes:
//!
//! ```yaml
//! text: "For ${CUSTOMER} use only"
//! pre_rotate_degrees: 0
//! fill_color: "#FF000080"
//! font_paths:
//!   - /usr/share/fonts/truetype/dejavu/DejaVuSans.ttf
//! ```
//!
//! `${VAR_NAME}` references are replaced with environment variable values
//! before parsing.

use crate::watermark::text_renderer::parse_hex_color;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest explicit font size accepted, in pixels.
pub const MAX_FONT_SIZE: u32 = 4096;

/// Largest transparent margin around a tile's text, in pixels.
pub const MAX_TILE_MARGIN: u32 = 4096;

// Default values
fn default_text() -> String {
    "仅供xxx使用，他用无效".to_string()
}

fn default_pre_rotate_degrees() -> f32 {
    90.0
}

fn default_font_size_divisor() -> u32 {
    25
}

fn default_fill_color() -> String {
    "#FF000080".to_string()
}

fn default_tile_rotation_degrees() -> f32 {
    -30.0
}

fn default_tile_margin() -> u32 {
    10
}

fn default_font_paths() -> Vec<PathBuf> {
    [
        "/System/Library/Fonts/PingFang.ttc",
        "/usr/share/fonts/truetype/droid/DroidSansFallbackFull.ttf",
        "C:\\Windows\\Fonts\\msyh.ttc",
        "C:\\Windows\\Fonts\\simhei.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

fn default_output_quality() -> u8 {
    98
}

fn default_output_dpi() -> u16 {
    300
}

fn default_max_source_pixels() -> u64 {
    100_000_000
}

/// Options for a single watermarking run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkConfig {
    /// Text stamped across the image
    #[serde(default = "default_text")]
    pub text: String,

    /// Counter-clockwise rotation of the whole source before stamping (default: 90)
    #[serde(default = "default_pre_rotate_degrees")]
    pub pre_rotate_degrees: f32,

    /// Explicit font size in pixels; derived from the image when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,

    /// Derived font size is `min(width, height) / font_size_divisor` (default: 25)
    #[serde(default = "default_font_size_divisor")]
    pub font_size_divisor: u32,

    /// Text color with alpha as hex string (default: "#FF000080")
    #[serde(default = "default_fill_color")]
    pub fill_color: String,

    /// Counter-clockwise rotation of every tile (default: -30)
    #[serde(default = "default_tile_rotation_degrees")]
    pub tile_rotation_degrees: f32,

    /// Horizontal stride between tiles; `text_width + 80` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal_spacing: Option<u32>,

    /// Vertical stride between tiles; `text_height + 120` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_spacing: Option<u32>,

    /// Transparent border around the text inside each tile (default: 10)
    #[serde(default = "default_tile_margin")]
    pub tile_margin: u32,

    /// Font files tried in order; the first usable one wins
    #[serde(default = "default_font_paths")]
    pub font_paths: Vec<PathBuf>,

    /// JPEG quality 1-100 (default: 98)
    #[serde(default = "default_output_quality")]
    pub output_quality: u8,

    /// Pixel density written to JPEG output (default: 300)
    #[serde(default = "default_output_dpi")]
    pub output_dpi: u16,

    /// Decoded sources above this many pixels are rejected (default: 100M)
    #[serde(default = "default_max_source_pixels")]
    pub max_source_pixels: u64,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            text: default_text(),
            pre_rotate_degrees: default_pre_rotate_degrees(),
            font_size: None,
            font_size_divisor: default_font_size_divisor(),
            fill_color: default_fill_color(),
            tile_rotation_degrees: default_tile_rotation_degrees(),
            horizontal_spacing: None,
            vertical_spacing: None,
            tile_margin: default_tile_margin(),
            font_paths: default_font_paths(),
            output_quality: default_output_quality(),
            output_dpi: default_output_dpi(),
            max_source_pixels: default_max_source_pixels(),
        }
    }
}

impl WatermarkConfig {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;

        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            std::env::var(var_name).map_err(|_| {
                format!(
                    "Environment variable '{}' is referenced but not set",
                    var_name
                )
            })?;
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        // An empty document means "all defaults"
        if substituted.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&substituted).map_err(|e| e.to_string())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), String> {
        parse_hex_color(&self.fill_color).map_err(|e| e.to_string())?;

        if !self.pre_rotate_degrees.is_finite() {
            return Err(format!(
                "pre_rotate_degrees must be a finite value, got {}",
                self.pre_rotate_degrees
            ));
        }

        if !self.tile_rotation_degrees.is_finite() {
            return Err(format!(
                "tile_rotation_degrees must be a finite value, got {}",
                self.tile_rotation_degrees
            ));
        }

        if let Some(size) = self.font_size {
            if size == 0 || size > MAX_FONT_SIZE {
                return Err(format!(
                    "font_size must be between 1 and {}, got {}",
                    MAX_FONT_SIZE, size
                ));
            }
        }

        if self.tile_margin > MAX_TILE_MARGIN {
            return Err(format!(
                "tile_margin must be at most {}, got {}",
                MAX_TILE_MARGIN, self.tile_margin
            ));
        }

        if self.font_size_divisor == 0 {
            return Err("font_size_divisor must be greater than 0".to_string());
        }

        if self.horizontal_spacing == Some(0) || self.vertical_spacing == Some(0) {
            return Err("Tile spacing overrides must be greater than 0".to_string());
        }

        if !(1..=100).contains(&self.output_quality) {
            return Err(format!(
                "output_quality must be between 1 and 100, got {}",
                self.output_quality
            ));
        }

        if self.output_dpi == 0 {
            return Err("output_dpi must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Font size for a working image of the given dimensions.
    pub fn font_size_for(&self, width: u32, height: u32) -> u32 {
        self.font_size
            .unwrap_or_else(|| width.min(height) / self.font_size_divisor.max(1))
            .max(1)
    }
}
