// Error type tests

use std::path::PathBuf;
use tilemark::error::WatermarkError;

#[test]
fn test_input_not_found_names_the_path() {
    let err = WatermarkError::InputNotFound(PathBuf::from("scans/id_card.jpg"));
    assert_eq!(err.to_string(), "File does not exist: 'scans/id_card.jpg'");
}

#[test]
fn test_source_too_large_message() {
    let err = WatermarkError::SourceTooLarge {
        width: 20000,
        height: 20000,
        max_pixels: 100_000_000,
    };
    let message = err.to_string();
    assert!(message.contains("20000x20000"));
    assert!(message.contains("100000000"));
}

#[test]
fn test_image_errors_are_classified() {
    use image::error::{ImageFormatHint, UnsupportedError};

    let unsupported = image::ImageError::Unsupported(UnsupportedError::from(
        ImageFormatHint::Name("tga".to_string()),
    ));
    assert!(matches!(
        WatermarkError::from(unsupported),
        WatermarkError::DecodeFailure(_)
    ));

    let io = image::ImageError::IoError(std::io::Error::new(
        std::io::ErrorKind::UnexpectedEof,
        "truncated",
    ));
    assert!(matches!(
        WatermarkError::from(io),
        WatermarkError::DecodeFailure(_)
    ));
}

#[test]
fn test_errors_work_with_anyhow() {
    fn fails() -> anyhow::Result<()> {
        Err(WatermarkError::EmptyText)?;
        Ok(())
    }

    let err = fails().unwrap_err();
    assert_eq!(err.to_string(), "Watermark text cannot be empty");
    assert!(err.downcast_ref::<WatermarkError>().is_some());
}
