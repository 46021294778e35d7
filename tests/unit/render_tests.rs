// Text rendering and compositing tests

use image::{Rgba, RgbaImage};
use tilemark::watermark::font::{bitmap_scale, resolve_font};
use tilemark::watermark::{
    blend_pixels, flatten, measure_text, parse_hex_color, render_text, Color, PlacementPosition,
    TextRenderOptions, WatermarkFont, WatermarkLayer,
};

#[test]
fn test_parse_hex_color_formats() {
    assert_eq!(parse_hex_color("#FF000080").unwrap(), Color::new(255, 0, 0, 128));
    assert_eq!(parse_hex_color("#00ff00").unwrap(), Color::rgb(0, 255, 0));
    assert_eq!(parse_hex_color("#FFF").unwrap(), Color::rgb(255, 255, 255));
    assert!(parse_hex_color("FF0000").is_err());
    assert!(parse_hex_color("#GG0000").is_err());
    assert!(parse_hex_color("#FF00").is_err());
}

#[test]
fn test_empty_font_list_falls_back_to_bitmap() {
    let resolution = resolve_font(&[]);
    assert!(resolution.is_fallback());
    assert!(resolution.path().is_none());
}

#[test]
fn test_unusable_fonts_are_skipped() {
    let dir = tempfile::TempDir::new().unwrap();
    let garbage = dir.path().join("broken.ttf");
    std::fs::write(&garbage, b"not a font").unwrap();

    let resolution = resolve_font(&[dir.path().join("missing.ttf"), garbage]);
    assert!(resolution.is_fallback());
}

#[test]
fn test_bitmap_measurement() {
    assert_eq!(bitmap_scale(16.0), 2);
    assert_eq!(bitmap_scale(3.0), 1);

    let metrics = measure_text(WatermarkFont::Bitmap, "ABC", 16.0).unwrap();
    assert_eq!((metrics.width, metrics.height), (48, 16));
}

#[test]
fn test_measurement_is_deterministic() {
    let first = measure_text(WatermarkFont::Bitmap, "仅供xxx使用", 24.0).unwrap();
    let second = measure_text(WatermarkFont::Bitmap, "仅供xxx使用", 24.0).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_render_patch_has_margin() {
    let options = TextRenderOptions {
        text: "HI".to_string(),
        font_size: 8.0,
        color: Color::new(255, 0, 0, 128),
        margin: 10,
    };
    let patch = render_text(WatermarkFont::Bitmap, &options).unwrap();

    assert_eq!(patch.dimensions(), (16 + 20, 8 + 20));
    // margin stays transparent
    assert!((0..patch.width()).all(|x| patch.get_pixel(x, 0)[3] == 0));
    // some text pixels carry the fill colour
    assert!(patch.pixels().any(|p| *p == Rgba([255, 0, 0, 128])));
}

#[test]
fn test_blend_half_red_over_white() {
    let result = blend_pixels(Rgba([255, 255, 255, 255]), Rgba([255, 0, 0, 128]));
    assert_eq!(result, Rgba([255, 127, 127, 255]));
}

#[test]
fn test_layer_composite_and_flatten() {
    let mut base = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255]));
    let tile = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));

    let mut layer = WatermarkLayer::new(10, 10);
    layer.stamp(&tile, PlacementPosition::new(-2, -2));
    layer.stamp(&tile, PlacementPosition::new(8, 8));
    layer.composite_onto(&mut base);

    let flat = flatten(base);
    assert_eq!(flat.get_pixel(0, 0).0, [0, 0, 0]);
    assert_eq!(flat.get_pixel(9, 9).0, [0, 0, 0]);
    assert_eq!(flat.get_pixel(5, 5).0, [255, 255, 255]);
    assert_eq!(layer.stamped(), 2);
}
