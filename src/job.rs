//! File-to-file watermarking job.

use crate::config::WatermarkConfig;
use crate::error::WatermarkError;
use crate::output::{derive_output_path, save_image, EncoderSettings};
use crate::watermark::apply_watermark;
use image::io::Reader as ImageReader;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Summary of a completed job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub font_fallback: bool,
    pub font_path: Option<PathBuf>,
    pub tile_count: usize,
}

/// Decode an image, sniffing the format from content rather than extension.
pub fn load_source(input: &Path) -> Result<DynamicImage, WatermarkError> {
    if !input.is_file() {
        return Err(WatermarkError::InputNotFound(input.to_path_buf()));
    }

    let reader = ImageReader::open(input)
        .map_err(|e| WatermarkError::DecodeFailure(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| WatermarkError::DecodeFailure(e.to_string()))?;
    reader
        .decode()
        .map_err(|e| WatermarkError::DecodeFailure(e.to_string()))
}

/// Watermark `input` with `config.text` and write the result.
///
/// Without an explicit `output` the result lands at `<stem>_watermark<.ext>`
/// beside the input. Nothing is written when any step fails.
pub fn watermark_file(
    input: &Path,
    output: Option<&Path>,
    config: &WatermarkConfig,
) -> Result<JobReport, WatermarkError> {
    let source = load_source(input)?;
    let result = apply_watermark(source, &config.text, config)?;

    if result.font_fallback {
        warn!(
            input = %input.display(),
            "No usable font found, watermark set in built-in bitmap font"
        );
    }

    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| derive_output_path(input));
    let settings = EncoderSettings::new(config.output_quality, config.output_dpi);
    let format = save_image(&result.image, &output_path, settings)?;

    let (width, height) = result.image.dimensions();
    info!(
        input = %input.display(),
        output = %output_path.display(),
        format = format.as_str(),
        width,
        height,
        tiles = result.tile_count,
        font_size = result.font_size,
        "Watermark applied"
    );

    Ok(JobReport {
        input: input.to_path_buf(),
        output: output_path,
        width,
        height,
        font_fallback: result.font_fallback,
        font_path: result.font_path,
        tile_count: result.tile_count,
    })
}
