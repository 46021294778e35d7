//! Watermark error types.
//!
//! Every failure of a watermarking run maps to one of these variants. A
//! missing font is deliberately absent: it resolves to the built-in bitmap
//! font (see [`crate::watermark::font::FontResolution`]).

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while watermarking an image.
#[derive(Error, Debug)]
pub enum WatermarkError {
    /// Input path does not exist (checked before any processing)
    #[error("File does not exist: '{}'", .0.display())]
    InputNotFound(PathBuf),

    /// The image library could not read or parse the input
    #[error("Failed to decode image: {0}")]
    DecodeFailure(String),

    /// Decoded dimensions exceed the configured pixel budget
    #[error("Image dimensions {width}x{height} exceed limit of {max_pixels} pixels")]
    SourceTooLarge {
        width: u32,
        height: u32,
        max_pixels: u64,
    },

    /// Watermark text is the empty string
    #[error("Watermark text cannot be empty")]
    EmptyText,

    /// Text could not be measured or rendered
    #[error("Failed to render text watermark: {0}")]
    RenderError(String),

    /// Invalid configuration
    #[error("Watermark configuration error: {0}")]
    Config(String),

    /// Encoding or writing the output failed
    #[error("Failed to write output image: {0}")]
    EncodeFailure(String),
}

impl From<image::ImageError> for WatermarkError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Encoding(e) => Self::EncodeFailure(e.to_string()),
            other => Self::DecodeFailure(other.to_string()),
        }
    }
}
