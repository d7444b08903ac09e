//! Watermark compositor for blending stamps onto images.
//!
//! A [`TileLayer`] holds one rendered stamp and every position it should be
//! stamped at. Applying the layer blends the stamp at each position with the
//! Porter-Duff "over" operator; positions may be negative or overhang the
//! right/bottom edge and are clipped to the target.
//!
//! # Example
//!
//! ```ignore
//! use grapemark::watermark::compositor::TileLayer;
//!
//! let layer = TileLayer::for_cells(stamp, &cells, &image_dims);
//! layer.apply(&mut target);
//! ```

use super::position::{
    is_visible, stamp_position, ImageDimensions, PlacementPosition, StampDimensions, TileCell,
};
use image::{Rgba, RgbaImage};

/// A stamp repeated at a set of positions.
#[derive(Clone)]
pub struct TileLayer {
    /// The rendered stamp (RGBA, alpha already applied).
    pub stamp: RgbaImage,
    /// Top-left corner of every placement.
    pub positions: Vec<PlacementPosition>,
}

impl std::fmt::Debug for TileLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileLayer")
            .field("stamp", &(self.stamp.width(), self.stamp.height()))
            .field("positions", &self.positions.len())
            .finish()
    }
}

impl TileLayer {
    /// Center the stamp on every cell, keeping only placements that touch the image.
    pub fn for_cells(stamp: RgbaImage, cells: &[TileCell], image: &ImageDimensions) -> Self {
        let dims = StampDimensions {
            width: stamp.width(),
            height: stamp.height(),
        };

        let positions = cells
            .iter()
            .map(|cell| stamp_position(cell, &dims))
            .filter(|pos| is_visible(pos, image, &dims))
            .collect();

        Self { stamp, positions }
    }

    /// Number of stamps this layer will paint.
    pub fn tile_count(&self) -> usize {
        self.positions.len()
    }

    /// Blend the stamp at every position onto the target.
    ///
    /// Positions are applied in order, so later stamps sit on top where
    /// neighbours overlap.
    pub fn apply(&self, target: &mut RgbaImage) {
        for position in &self.positions {
            blend_stamp(target, &self.stamp, *position);
        }
    }
}

/// Blend a single stamp onto the target image.
fn blend_stamp(target: &mut RgbaImage, stamp: &RgbaImage, position: PlacementPosition) {
    let target_width = target.width() as i64;
    let target_height = target.height() as i64;

    let x_start = (position.x as i64).max(0);
    let y_start = (position.y as i64).max(0);
    let x_end = (position.x as i64 + stamp.width() as i64).min(target_width);
    let y_end = (position.y as i64 + stamp.height() as i64).min(target_height);

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let sx = (tx - position.x as i64) as u32;
            let sy = (ty - position.y as i64) as u32;

            let fg = stamp.get_pixel(sx, sy);
            if fg[3] == 0 {
                continue;
            }

            let bg = target.get_pixel(tx as u32, ty as u32);
            let blended = blend_pixels(*bg, *fg);
            target.put_pixel(tx as u32, ty as u32, blended);
        }
    }
}

/// Blend two pixels using the "over" operator:
/// result = foreground + background * (1 - foreground.alpha)
fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>) -> Rgba<u8> {
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
