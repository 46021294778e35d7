//! Output image encoders
//!
//! Watermarked images are always opaque, so every encoder takes RGB data.
//! The format is picked from the output file extension; anything unknown is
//! written as JPEG.

use crate::error::WatermarkError;
use image::RgbImage;
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }

    /// Format for an output path, JPEG unless the extension names another.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
            .unwrap_or(Self::Jpeg)
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::WebP),
            other => Err(format!("Unsupported output format: {}", other)),
        }
    }
}

/// Encoder parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderSettings {
    /// Quality value (1-100, where 100 is best quality)
    pub quality: u8,
    /// Pixel density in dots per inch
    pub dpi: u16,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            quality: 98,
            dpi: 300,
        }
    }
}

impl EncoderSettings {
    pub fn new(quality: u8, dpi: u16) -> Self {
        Self {
            quality: quality.clamp(1, 100),
            dpi: dpi.max(1),
        }
    }
}

/// Trait for image encoders
pub trait ImageEncoder {
    /// The output format this encoder produces
    fn format(&self) -> OutputFormat;

    /// Encode an opaque image to bytes
    fn encode(&self, image: &RgbImage, settings: EncoderSettings)
        -> Result<Vec<u8>, WatermarkError>;
}

/// JPEG encoder honoring quality and DPI
pub struct JpegEncoder;

impl ImageEncoder for JpegEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Jpeg
    }

    fn encode(
        &self,
        image: &RgbImage,
        settings: EncoderSettings,
    ) -> Result<Vec<u8>, WatermarkError> {
        use image::codecs::jpeg::{JpegEncoder as ImageJpegEncoder, PixelDensity};
        use image::ImageEncoder as _;

        let mut output = Cursor::new(Vec::new());
        let mut encoder = ImageJpegEncoder::new_with_quality(&mut output, settings.quality);
        encoder.set_pixel_density(PixelDensity::dpi(settings.dpi));

        encoder
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ColorType::Rgb8,
            )
            .map_err(|e| WatermarkError::EncodeFailure(format!("jpeg: {}", e)))?;

        Ok(output.into_inner())
    }
}

/// PNG encoder (lossless; quality and DPI do not apply)
pub struct PngEncoder;

impl ImageEncoder for PngEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Png
    }

    fn encode(
        &self,
        image: &RgbImage,
        _settings: EncoderSettings,
    ) -> Result<Vec<u8>, WatermarkError> {
        use image::codecs::png::PngEncoder as ImagePngEncoder;
        use image::ImageEncoder as _;

        let mut output = Cursor::new(Vec::new());
        let encoder = ImagePngEncoder::new(&mut output);

        encoder
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ColorType::Rgb8,
            )
            .map_err(|e| WatermarkError::EncodeFailure(format!("png: {}", e)))?;

        Ok(output.into_inner())
    }
}

/// WebP encoder
///
/// Note: The `image` crate only supports lossless WebP encoding.
pub struct WebPEncoder;

impl ImageEncoder for WebPEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::WebP
    }

    fn encode(
        &self,
        image: &RgbImage,
        _settings: EncoderSettings,
    ) -> Result<Vec<u8>, WatermarkError> {
        use image::codecs::webp::WebPEncoder as ImageWebPEncoder;
        use image::ImageEncoder as _;

        let mut output = Cursor::new(Vec::new());
        let encoder = ImageWebPEncoder::new_lossless(&mut output);

        encoder
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ColorType::Rgb8,
            )
            .map_err(|e| WatermarkError::EncodeFailure(format!("webp: {}", e)))?;

        Ok(output.into_inner())
    }
}

/// Factory for creating encoders based on output format
pub struct EncoderFactory;

impl EncoderFactory {
    pub fn create(format: OutputFormat) -> Box<dyn ImageEncoder> {
        match format {
            OutputFormat::Jpeg => Box::new(JpegEncoder),
            OutputFormat::Png => Box::new(PngEncoder),
            OutputFormat::WebP => Box::new(WebPEncoder),
        }
    }
}
