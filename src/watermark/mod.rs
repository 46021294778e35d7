//! Tiled text watermarking.
//!
//! The watermark text is rendered once, rotated, and stamped in a regular
//! grid over a transparent layer the size of the (optionally pre-rotated)
//! image. The layer is then blended over the image, and the result is
//! flattened to opaque RGB.
//!
//! # Features
//!
//! - **Pre-rotation** of the source with canvas expansion (default 90° CCW)
//! - **Font search** over an ordered list of font files, with a built-in
//!   bitmap font as the named fallback outcome
//! - **Rotated tiles** with overlapping coverage up to the image edges
//!
//! # Configuration Example
//!
//! ```yaml
//! text: "For internal use only"
//! fill_color: "#FF000080"
//! tile_rotation_degrees: -30
//! ```

pub mod compositor;
pub mod font;
pub mod position;
pub mod processor;
pub mod rotate;
pub mod text_renderer;

// Re-export main types for convenience
pub use compositor::{blend_pixels, flatten, WatermarkLayer};
pub use font::{resolve_font, FontResolution, WatermarkFont};
pub use position::{calculate_tiled_positions, ImageDimensions, PlacementPosition, TileGrid};
pub use processor::{apply_watermark, check_source_dimensions, WatermarkOutput};
pub use rotate::{rotate_expand, rotate_source, rotated_dimensions};
pub use text_renderer::{
    measure_text, parse_hex_color, render_text, Color, TextMetrics, TextRenderOptions,
};
