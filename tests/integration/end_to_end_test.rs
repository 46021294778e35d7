//! End-to-end watermarking tests
//!
//! Input file -> decode -> rotate -> tile -> encode -> output file.

use super::test_harness::{bitmap_config, fixture_font, write_document};
use image::ColorType;
use tempfile::TempDir;
use tilemark::config::WatermarkConfig;
use tilemark::error::WatermarkError;
use tilemark::job::watermark_file;

#[test]
fn test_landscape_scan_becomes_portrait_output() {
    let dir = TempDir::new().unwrap();
    let input = write_document(dir.path(), "id_card.png", 600, 400);

    let report = watermark_file(&input, None, &bitmap_config("SAMPLE")).unwrap();

    assert_eq!(report.output, dir.path().join("id_card_watermark.png"));
    let written = image::open(&report.output).unwrap();
    assert_eq!((written.width(), written.height()), (400, 600));
    assert!(report.tile_count > 1);
}

#[test]
fn test_jpeg_output_is_opaque_rgb() {
    let dir = TempDir::new().unwrap();
    let input = write_document(dir.path(), "scan.png", 320, 200);
    let output = dir.path().join("scan_out.jpg");

    watermark_file(&input, Some(&output), &bitmap_config("SAMPLE")).unwrap();

    let written = image::open(&output).unwrap();
    assert_eq!(written.color(), ColorType::Rgb8);
    assert_eq!((written.width(), written.height()), (200, 320));
}

#[test]
fn test_no_rotation_keeps_orientation() {
    let dir = TempDir::new().unwrap();
    let input = write_document(dir.path(), "page.png", 600, 400);
    let config = WatermarkConfig {
        pre_rotate_degrees: 0.0,
        ..bitmap_config("SAMPLE")
    };

    let report = watermark_file(&input, None, &config).unwrap();
    assert_eq!((report.width, report.height), (600, 400));
}

#[test]
fn test_watermark_changes_pixels() {
    let dir = TempDir::new().unwrap();
    let input = write_document(dir.path(), "page.png", 300, 300);
    let config = WatermarkConfig {
        pre_rotate_degrees: 0.0,
        font_size: Some(24),
        ..bitmap_config("CONFIDENTIAL")
    };

    let report = watermark_file(&input, None, &config).unwrap();

    let before = image::open(&input).unwrap().to_rgb8();
    let after = image::open(&report.output).unwrap().to_rgb8();
    let reddened = before
        .pixels()
        .zip(after.pixels())
        .filter(|(b, a)| a[0] > a[1] && b[0] == b[1])
        .count();
    assert!(reddened > 0);
}

#[test]
fn test_missing_input_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("absent.png");

    let result = watermark_file(&input, None, &bitmap_config("SAMPLE"));

    assert!(matches!(result, Err(WatermarkError::InputNotFound(_))));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_fallback_font_is_reported() {
    let dir = TempDir::new().unwrap();
    let input = write_document(dir.path(), "page.png", 200, 200);
    let config = WatermarkConfig {
        font_paths: vec![dir.path().join("no-such-font.ttf")],
        ..bitmap_config("仅供xxx使用，他用无效")
    };

    let report = watermark_file(&input, None, &config).unwrap();
    assert!(report.font_fallback);
    assert!(report.font_path.is_none());
}

#[test]
fn test_repeated_runs_are_identical() {
    let dir = TempDir::new().unwrap();
    let input = write_document(dir.path(), "page.png", 240, 160);

    let first = dir.path().join("first.png");
    let second = dir.path().join("second.png");
    watermark_file(&input, Some(&first), &bitmap_config("SAMPLE")).unwrap();
    watermark_file(&input, Some(&second), &bitmap_config("SAMPLE")).unwrap();

    assert_eq!(std::fs::read(first).unwrap(), std::fs::read(second).unwrap());
}

#[test]
fn test_outline_font_from_search_list() {
    let dir = TempDir::new().unwrap();
    let input = write_document(dir.path(), "page.png", 400, 300);
    let config = WatermarkConfig {
        text: "SAMPLE COPY".to_string(),
        font_paths: vec![dir.path().join("PingFang.ttc"), fixture_font()],
        ..Default::default()
    };

    let report = watermark_file(&input, None, &config).unwrap();

    assert!(!report.font_fallback);
    assert_eq!(report.font_path, Some(fixture_font()));
    assert_eq!((report.width, report.height), (300, 400));
    assert!(report.tile_count > 1);

    let before = image::open(&input).unwrap().rotate270().to_rgb8();
    let after = image::open(&report.output).unwrap().to_rgb8();
    let reddened = before
        .pixels()
        .zip(after.pixels())
        .filter(|(b, a)| a[0] > a[1] && b[0] == b[1])
        .count();
    assert!(reddened > 100);
}

#[test]
fn test_outline_font_with_unsupported_characters_still_renders() {
    let dir = TempDir::new().unwrap();
    let input = write_document(dir.path(), "page.png", 200, 200);
    let config = WatermarkConfig {
        font_paths: vec![fixture_font()],
        ..bitmap_config("仅供xxx使用，他用无效")
    };

    let report = watermark_file(&input, None, &config).unwrap();
    assert!(!report.font_fallback);
    assert!(report.output.exists());
}
