//! Canvas-expanding rotation.
//!
//! Angles are in degrees, counter-clockwise as seen on screen. The output
//! canvas is the bounding box of the rotated input, so no corner is cropped.
//! Right angles are exact pixel transpositions; any other angle resamples
//! bilinearly onto a transparent canvas.

use image::{imageops, DynamicImage, Rgba, RgbaImage};

/// Rotations within this many degrees of a right angle snap to it.
const RIGHT_ANGLE_TOLERANCE: f32 = 1e-4;

/// Quarter turns (0-3, counter-clockwise) when `degrees` is a right angle.
fn quarter_turns(degrees: f32) -> Option<u32> {
    let normalized = degrees.rem_euclid(360.0);
    let turns = (normalized / 90.0).round();
    if (normalized - turns * 90.0).abs() < RIGHT_ANGLE_TOLERANCE {
        Some(turns as u32 % 4)
    } else {
        None
    }
}

/// Dimensions of a `width x height` canvas after rotating by `degrees`.
pub fn rotated_dimensions(width: u32, height: u32, degrees: f32) -> (u32, u32) {
    match quarter_turns(degrees) {
        Some(0) | Some(2) => (width, height),
        Some(_) => (height, width),
        None => {
            let radians = degrees.to_radians();
            let cos = radians.cos().abs();
            let sin = radians.sin().abs();
            let w = width as f32;
            let h = height as f32;

            // Shave float noise so exact fits don't round up a pixel
            let rotated_width = (w * cos + h * sin - 1e-3).ceil().max(1.0) as u32;
            let rotated_height = (w * sin + h * cos - 1e-3).ceil().max(1.0) as u32;
            (rotated_width, rotated_height)
        }
    }
}

/// Rotate a decoded source image, keeping its pixel format on right angles.
///
/// Other angles convert to RGBA so the exposed corners are transparent.
pub fn rotate_source(image: DynamicImage, degrees: f32) -> DynamicImage {
    match quarter_turns(degrees) {
        Some(0) => image,
        Some(1) => image.rotate270(),
        Some(2) => image.rotate180(),
        Some(3) => image.rotate90(),
        _ => DynamicImage::ImageRgba8(rotate_expand(&image.to_rgba8(), degrees)),
    }
}

/// Rotate an RGBA image counter-clockwise by `degrees`, expanding the canvas.
pub fn rotate_expand(image: &RgbaImage, degrees: f32) -> RgbaImage {
    match quarter_turns(degrees) {
        Some(0) => return image.clone(),
        Some(1) => return imageops::rotate270(image),
        Some(2) => return imageops::rotate180(image),
        Some(3) => return imageops::rotate90(image),
        _ => {}
    }

    let (src_width, src_height) = image.dimensions();
    let (dst_width, dst_height) = rotated_dimensions(src_width, src_height, degrees);
    let mut rotated = RgbaImage::new(dst_width, dst_height);

    if src_width == 0 || src_height == 0 {
        return rotated;
    }

    let radians = degrees.to_radians();
    let cos = radians.cos();
    let sin = radians.sin();

    let src_cx = src_width as f32 / 2.0;
    let src_cy = src_height as f32 / 2.0;
    let dst_cx = dst_width as f32 / 2.0;
    let dst_cy = dst_height as f32 / 2.0;

    let max_x = (src_width - 1) as f32;
    let max_y = (src_height - 1) as f32;

    for dy in 0..dst_height {
        for dx in 0..dst_width {
            // Pixel centre relative to the destination centre
            let rx = dx as f32 + 0.5 - dst_cx;
            let ry = dy as f32 + 0.5 - dst_cy;

            // Inverse of the on-screen counter-clockwise rotation (y grows down)
            let sx = rx * cos - ry * sin + src_cx - 0.5;
            let sy = rx * sin + ry * cos + src_cy - 0.5;

            if sx < -0.5 || sy < -0.5 || sx > max_x + 0.5 || sy > max_y + 0.5 {
                continue;
            }

            rotated.put_pixel(dx, dy, sample_bilinear(image, sx, sy, max_x, max_y));
        }
    }

    rotated
}

fn sample_bilinear(image: &RgbaImage, sx: f32, sy: f32, max_x: f32, max_y: f32) -> Rgba<u8> {
    let sx = sx.clamp(0.0, max_x);
    let sy = sy.clamp(0.0, max_y);

    let x0 = sx.floor() as u32;
    let y0 = sy.floor() as u32;
    let x1 = (x0 + 1).min(max_x as u32);
    let y1 = (y0 + 1).min(max_y as u32);

    let fx = sx - x0 as f32;
    let fy = sy - y0 as f32;

    let p00 = image.get_pixel(x0, y0);
    let p10 = image.get_pixel(x1, y0);
    let p01 = image.get_pixel(x0, y1);
    let p11 = image.get_pixel(x1, y1);

    let weights = [
        (p00, (1.0 - fx) * (1.0 - fy)),
        (p10, fx * (1.0 - fy)),
        (p01, (1.0 - fx) * fy),
        (p11, fx * fy),
    ];

    // Interpolate premultiplied colour so transparent neighbours add no tint
    let alpha: f32 = weights.iter().map(|(p, w)| p[3] as f32 * w).sum();
    if alpha <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |c: usize| -> u8 {
        let premultiplied: f32 = weights
            .iter()
            .map(|(p, w)| p[c] as f32 * p[3] as f32 * w)
            .sum();
        (premultiplied / alpha).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(0),
        channel(1),
        channel(2),
        alpha.round().clamp(0.0, 255.0) as u8,
    ])
}
