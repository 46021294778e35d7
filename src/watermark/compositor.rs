//! Watermark compositor for blending tiles onto images.
//!
//! Tiles are stamped onto a transparent [`WatermarkLayer`] the size of the
//! working image, and the finished layer is blended over the image in one
//! pass. All blending uses the Porter-Duff "over" operator.
//!
//! # Example
//!
//! ```ignore
//! use tilemark::watermark::compositor::{flatten, WatermarkLayer};
//!
//! let mut layer = WatermarkLayer::new(image.width(), image.height());
//! layer.stamp_all(&tile, &positions);
//! layer.composite_onto(&mut image);
//!
//! let opaque = flatten(image);
//! ```

use super::position::PlacementPosition;
use image::{DynamicImage, Rgba, RgbImage, RgbaImage};

/// Transparent canvas that collects stamped tiles.
#[derive(Clone)]
pub struct WatermarkLayer {
    canvas: RgbaImage,
    stamped: usize,
}

impl std::fmt::Debug for WatermarkLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatermarkLayer")
            .field("dimensions", &self.canvas.dimensions())
            .field("stamped", &self.stamped)
            .finish()
    }
}

impl WatermarkLayer {
    /// Create a fully transparent layer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: RgbaImage::new(width, height),
            stamped: 0,
        }
    }

    /// Blend `tile` onto the layer with its top-left corner at `position`.
    ///
    /// Parts of the tile outside the layer are clipped.
    pub fn stamp(&mut self, tile: &RgbaImage, position: PlacementPosition) {
        blend_onto(&mut self.canvas, tile, position);
        self.stamped += 1;
    }

    /// Stamp `tile` at every position, in order.
    pub fn stamp_all(&mut self, tile: &RgbaImage, positions: &[PlacementPosition]) {
        for position in positions {
            self.stamp(tile, *position);
        }
    }

    /// Blend the layer over `target`, which must share its dimensions.
    pub fn composite_onto(&self, target: &mut RgbaImage) {
        debug_assert_eq!(target.dimensions(), self.canvas.dimensions());
        blend_onto(target, &self.canvas, PlacementPosition::new(0, 0));
    }

    /// Number of tiles stamped so far.
    pub fn stamped(&self) -> usize {
        self.stamped
    }
}

/// Blend `top` onto `target` at `position`, clipping to the target bounds.
fn blend_onto(target: &mut RgbaImage, top: &RgbaImage, position: PlacementPosition) {
    let target_width = target.width() as i64;
    let target_height = target.height() as i64;

    let x0 = position.x as i64;
    let y0 = position.y as i64;

    // Calculate the visible region (clamp to target bounds)
    let x_start = x0.max(0);
    let y_start = y0.max(0);
    let x_end = (x0 + top.width() as i64).min(target_width);
    let y_end = (y0 + top.height() as i64).min(target_height);

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let top_pixel = *top.get_pixel((tx - x0) as u32, (ty - y0) as u32);
            if top_pixel[3] == 0 {
                continue;
            }

            let target_pixel = target.get_pixel_mut(tx as u32, ty as u32);
            *target_pixel = blend_pixels(*target_pixel, top_pixel);
        }
    }
}

/// Blend two pixels using alpha compositing.
///
/// Uses the "over" operator: result = foreground + background * (1 - foreground.alpha)
pub fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>) -> Rgba<u8> {
    let fg_alpha = foreground[3] as f32 / 255.0;
    let bg_alpha = background[3] as f32 / 255.0;

    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}

/// Drop the alpha channel, producing an opaque image for output.
pub fn flatten(image: RgbaImage) -> RgbImage {
    DynamicImage::ImageRgba8(image).into_rgb8()
}
