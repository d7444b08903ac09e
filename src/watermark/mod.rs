//! Watermark module: the tiled text pattern and everything needed to paint it.
//!
//! # Features
//!
//! - **Tiled text watermark** repeated on a `tile_width × tile_height` grid
//! - **Per-tile rotation** about each cell's own center
//! - **Translucent fill** (alpha carried by the fill color)
//! - **Clamped options**: out-of-range numbers snap to the nearest bound
//!
//! # Rendering Steps
//!
//! 1. Resize the target to the source's natural size and copy the source in
//! 2. Rasterise the text once into a rotated stamp
//! 3. Center the stamp on every grid cell, starting one period before the origin
//! 4. Blend each placement with the "over" operator

pub mod compositor;
pub mod options;
pub mod position;
pub mod renderer;
pub mod text_renderer;

// Re-export main types for convenience
pub use compositor::TileLayer;
pub use options::{OptionsPatch, WatermarkOptions};
pub use position::{
    calculate_tile_cells, is_visible, stamp_position, ImageDimensions, PlacementPosition,
    StampDimensions, TileCell, TileDimensions,
};
pub use renderer::{build_tile_layer, render_placeholder, render_watermark, RenderSummary};
pub use text_renderer::{measure_text, parse_hex_color, render_text, Color, TextRenderOptions};
