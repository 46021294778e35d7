//! Writing watermarked images to disk.
//!
//! The image is fully encoded in memory, written to a temporary file next to
//! the destination and renamed into place. A failed run leaves no file at the
//! output path.

pub mod encoder;

pub use encoder::{EncoderFactory, EncoderSettings, ImageEncoder, OutputFormat};

use crate::error::WatermarkError;
use image::RgbImage;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Default output path: `<stem>_watermark<.ext>` next to the input.
pub fn derive_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match input.extension() {
        Some(ext) => format!("{}_watermark.{}", stem, ext.to_string_lossy()),
        None => format!("{}_watermark", stem),
    };
    input.with_file_name(file_name)
}

/// Encode `image` in the format named by `path` and persist it atomically.
pub fn save_image(
    image: &RgbImage,
    path: &Path,
    settings: EncoderSettings,
) -> Result<OutputFormat, WatermarkError> {
    let format = OutputFormat::from_path(path);
    let data = EncoderFactory::create(format).encode(image, settings)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staging = NamedTempFile::new_in(dir).map_err(|e| {
        WatermarkError::EncodeFailure(format!(
            "cannot create file in '{}': {}",
            dir.display(),
            e
        ))
    })?;
    staging
        .write_all(&data)
        .and_then(|_| staging.as_file().sync_all())
        .map_err(|e| WatermarkError::EncodeFailure(e.to_string()))?;
    staging
        .persist(path)
        .map_err(|e| WatermarkError::EncodeFailure(e.error.to_string()))?;

    debug!(
        path = %path.display(),
        format = format.as_str(),
        bytes = data.len(),
        "Wrote output image"
    );

    Ok(format)
}
