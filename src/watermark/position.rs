//! Tile grid calculation for watermark placement.
//!
//! The grid repeats with a period of `tile_width × tile_height` and starts
//! one full period before the image origin on both axes, so a rotated stamp
//! never leaves an uncovered strip along the top or left edge. Each cell
//! carries its own center; stamps are centered on it, which keeps cell
//! centers fixed whatever the rotation.
//!
//! # Example
//!
//! ```ignore
//! use grapemark::watermark::position::{calculate_tile_cells, ImageDimensions, TileDimensions};
//!
//! let image = ImageDimensions { width: 800, height: 600 };
//! let tile = TileDimensions { width: 252, height: 180 };
//!
//! let cells = calculate_tile_cells(&image, &tile);
//! assert_eq!(cells[0].origin.x, -252);
//! ```

/// Dimensions of the target image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Dimensions of one tile (the repeat period of the grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileDimensions {
    pub width: u32,
    pub height: u32,
}

/// Dimensions of a rendered stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StampDimensions {
    pub width: u32,
    pub height: u32,
}

/// Top-left corner of a placed stamp or cell.
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

/// One cell of the tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileCell {
    pub origin: PlacementPosition,
    pub size: TileDimensions,
}

impl TileCell {
    /// Center point of the cell.
    pub fn center(&self) -> (f32, f32) {
        (
            self.origin.x as f32 + self.size.width as f32 / 2.0,
            self.origin.y as f32 + self.size.height as f32 / 2.0,
        )
    }
}

/// Calculate every cell of the tile grid covering the image.
///
/// Cells start at `(-tile.width, -tile.height)` and continue while the
/// cell's leading edge lies inside the image. Returns cells in row-major
/// order. A zero-sized tile yields no cells.
pub fn calculate_tile_cells(image: &ImageDimensions, tile: &TileDimensions) -> Vec<TileCell> {
    if tile.width == 0 || tile.height == 0 {
        return Vec::new();
    }

    let step_x = tile.width as i64;
    let step_y = tile.height as i64;
    let mut cells = Vec::new();

    let mut y = -step_y;
    while y < image.height as i64 {
        let mut x = -step_x;
        while x < image.width as i64 {
            cells.push(TileCell {
                origin: PlacementPosition::new(x as i32, y as i32),
                size: *tile,
            });
            x += step_x;
        }
        y += step_y;
    }

    cells
}

/// Position that centers a stamp on a cell.
pub fn stamp_position(cell: &TileCell, stamp: &StampDimensions) -> PlacementPosition {
    let dx = (cell.size.width as i32 - stamp.width as i32).div_euclid(2);
    let dy = (cell.size.height as i32 - stamp.height as i32).div_euclid(2);
    PlacementPosition::new(cell.origin.x + dx, cell.origin.y + dy)
}

/// Check if a stamp placed at `pos` is at least partially visible within the image.
pub fn is_visible(pos: &PlacementPosition, image: &ImageDimensions, stamp: &StampDimensions) -> bool {
    let right = pos.x as i64 + stamp.width as i64;
    let bottom = pos.y as i64 + stamp.height as i64;

    (pos.x as i64) < image.width as i64
        && (pos.y as i64) < image.height as i64
        && right > 0
        && bottom > 0
}
