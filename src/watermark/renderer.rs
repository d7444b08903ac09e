//! Tile renderer: paints a source image plus the repeating text pattern
//! onto a target raster.
//!
//! The renderer keeps no state between calls. Everything it needs comes in
//! through its arguments, so separate targets can be rendered independently.

use super::compositor::TileLayer;
use super::options::WatermarkOptions;
use super::position::{calculate_tile_cells, ImageDimensions};
use super::text_renderer::{render_text, TextRenderOptions};
use crate::constants::PLACEHOLDER_CHECKER_SIZE;
use crate::error::WatermarkError;
use image::{Rgba, RgbaImage};
use tracing::debug;

/// What a completed render produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    pub width: u32,
    pub height: u32,
    /// Number of stamps painted (placements touching the image).
    pub tiles: usize,
}

/// Build the stamp layer for an image of the given size.
///
/// Returns `None` when the text is empty: an empty pattern is valid and
/// paints nothing.
pub fn build_tile_layer(
    image: &ImageDimensions,
    options: &WatermarkOptions,
) -> Result<Option<TileLayer>, WatermarkError> {
    let options = options.clamped();
    if options.text.is_empty() {
        return Ok(None);
    }

    let stamp = render_text(&TextRenderOptions {
        text: options.text.clone(),
        font_size: options.font_size,
        color: options.fill_color,
        rotation_degrees: Some(options.rotation_degrees),
    })?;

    let cells = calculate_tile_cells(image, &options.tile_dimensions());
    Ok(Some(TileLayer::for_cells(stamp, &cells, image)))
}

/// Repaint `target` with `source` at natural size and stamp the tiled
/// watermark over it.
///
/// The target is resized to exactly the source dimensions. A source with no
/// pixels is rejected before the target is touched, as is any failure to
/// rasterise the text.
pub fn render_watermark(
    target: &mut RgbaImage,
    source: &RgbaImage,
    options: &WatermarkOptions,
) -> Result<RenderSummary, WatermarkError> {
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 {
        return Err(WatermarkError::InvalidSource(format!(
            "source has no pixels ({}x{})",
            width, height
        )));
    }

    let dims = ImageDimensions { width, height };
    let layer = build_tile_layer(&dims, options)?;

    // Base layer at natural scale
    target.clone_from(source);

    let tiles = match &layer {
        Some(layer) => {
            layer.apply(target);
            layer.tile_count()
        }
        None => 0,
    };

    debug!(width, height, tiles, "Rendered watermark");

    Ok(RenderSummary {
        width,
        height,
        tiles,
    })
}

/// Paint the placeholder shown while nothing is selected: a light checker
/// pattern, no watermark.
pub fn render_placeholder(target: &mut RgbaImage, width: u32, height: u32) -> RenderSummary {
    let (width, height) = (width.max(1), height.max(1));
    let cell = PLACEHOLDER_CHECKER_SIZE.max(1);

    *target = RgbaImage::from_fn(width, height, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            Rgba([229, 231, 235, 255])
        } else {
            Rgba([209, 213, 219, 255])
        }
    });

    RenderSummary {
        width,
        height,
        tiles: 0,
    }
}
