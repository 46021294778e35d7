//! Tile grid calculation for watermark placement.
//!
//! The grid starts one text box above and to the left of the image origin and
//! runs one text box past the far edges, so partial tiles cover the borders
//! instead of leaving untreated margins.
//!
//! # Example
//!
//! ```ignore
//! use tilemark::watermark::position::{calculate_tiled_positions, ImageDimensions, TileGrid};
//!
//! let image = ImageDimensions { width: 400, height: 600 };
//! let grid = TileGrid::new(120, 20, None, None);
//!
//! let positions = calculate_tiled_positions(&image, &grid);
//! assert_eq!(positions[0], PlacementPosition::new(-120, -20));
//! ```

/// Gap added to the text width to get the default horizontal stride.
pub const DEFAULT_HORIZONTAL_GAP: u32 = 80;

/// Gap added to the text height to get the default vertical stride.
pub const DEFAULT_VERTICAL_GAP: u32 = 120;

/// Dimensions of the target image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// A single position where a tile's top-left corner is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementPosition {
    pub x: i32,
    pub y: i32,
}

impl PlacementPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Text box size and strides of the tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    pub text_width: u32,
    pub text_height: u32,
    pub step_x: u32,
    pub step_y: u32,
}

impl TileGrid {
    /// Grid for a text box, using the default gaps unless overridden.
    ///
    /// Strides saturate at `u32::MAX`, which leaves a single row or column.
    pub fn new(
        text_width: u32,
        text_height: u32,
        horizontal_spacing: Option<u32>,
        vertical_spacing: Option<u32>,
    ) -> Self {
        Self {
            text_width,
            text_height,
            step_x: horizontal_spacing
                .unwrap_or_else(|| text_width.saturating_add(DEFAULT_HORIZONTAL_GAP)),
            step_y: vertical_spacing
                .unwrap_or_else(|| text_height.saturating_add(DEFAULT_VERTICAL_GAP)),
        }
    }
}

/// Calculate positions for tiled watermark placement.
///
/// Rows run from `y = -text_height` while `y < height + text_height`; within a
/// row, columns run from `x = -text_width` while `x < width + text_width`.
/// A zero stride yields no positions.
pub fn calculate_tiled_positions(image: &ImageDimensions, grid: &TileGrid) -> Vec<PlacementPosition> {
    if grid.step_x == 0 || grid.step_y == 0 {
        return Vec::new();
    }

    let start_x = -(grid.text_width as i64);
    let start_y = -(grid.text_height as i64);
    let end_x = image.width as i64 + grid.text_width as i64;
    let end_y = image.height as i64 + grid.text_height as i64;

    let mut positions = Vec::new();

    let mut y = start_y;
    while y < end_y {
        let mut x = start_x;
        while x < end_x {
            positions.push(PlacementPosition::new(x as i32, y as i32));
            x += grid.step_x as i64;
        }
        y += grid.step_y as i64;
    }

    positions
}
