//! Watermark option types.
//!
//! [`WatermarkOptions`] is the complete, immutable record the renderer
//! consumes. [`OptionsPatch`] is what an options source sends: any subset of
//! fields, always resolved over the documented defaults (never over whatever
//! options were active before).
//!
//! Field names accept both snake_case and the keys the parameter form uses:
//!
//! ```yaml
//! text: "SAMPLE"
//! fillStyle: "#00000080"   # or fill_color
//! fontSize: 26             # or font_size
//! rotate: 20               # or rotation_degrees
//! watermarkWidth: 252      # or tile_width
//! watermarkHeight: 180     # or tile_height
//! ```

use super::position::TileDimensions;
use super::text_renderer::{parse_hex_color, Color};
use crate::constants::*;
use serde::{Deserialize, Serialize};

fn default_fill_color() -> Color {
    // The constant is a valid literal; black at half alpha if it ever is not
    parse_hex_color(DEFAULT_FILL_COLOR).unwrap_or(Color::new(0, 0, 0, 128))
}

/// Clamp to `[min, max]`, falling back to `default` for NaN or infinities.
fn clamp_or_default(value: f32, min: f32, max: f32, default: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        default
    }
}

/// Complete parameter set for one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkOptions {
    /// Text stamped in every tile; empty means no tiles.
    pub text: String,

    /// Fill color; the alpha channel keeps the watermark non-destructive.
    #[serde(alias = "fillStyle")]
    pub fill_color: Color,

    /// Font size in pixels, [12, 64].
    #[serde(alias = "fontSize")]
    pub font_size: f32,

    /// Clockwise rotation of each tile about its own center, [0, 45].
    #[serde(alias = "rotate")]
    pub rotation_degrees: f32,

    /// Horizontal repeat period in pixels, [100, 560].
    #[serde(alias = "watermarkWidth")]
    pub tile_width: f32,

    /// Vertical repeat period in pixels, [100, 360].
    #[serde(alias = "watermarkHeight")]
    pub tile_height: f32,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            fill_color: default_fill_color(),
            font_size: DEFAULT_FONT_SIZE,
            rotation_degrees: DEFAULT_ROTATION,
            tile_width: DEFAULT_TILE_WIDTH,
            tile_height: DEFAULT_TILE_HEIGHT,
        }
    }
}

impl WatermarkOptions {
    /// Copy with every numeric field clamped to its documented bounds.
    pub fn clamped(&self) -> Self {
        Self {
            text: self.text.clone(),
            fill_color: self.fill_color,
            font_size: clamp_or_default(
                self.font_size,
                FONT_SIZE_MIN,
                FONT_SIZE_MAX,
                DEFAULT_FONT_SIZE,
            ),
            rotation_degrees: clamp_or_default(
                self.rotation_degrees,
                ROTATION_MIN,
                ROTATION_MAX,
                DEFAULT_ROTATION,
            ),
            tile_width: clamp_or_default(
                self.tile_width,
                TILE_WIDTH_MIN,
                TILE_WIDTH_MAX,
                DEFAULT_TILE_WIDTH,
            ),
            tile_height: clamp_or_default(
                self.tile_height,
                TILE_HEIGHT_MIN,
                TILE_HEIGHT_MAX,
                DEFAULT_TILE_HEIGHT,
            ),
        }
    }

    /// Whether every numeric field already lies within bounds.
    pub fn is_within_bounds(&self) -> bool {
        self == &self.clamped()
    }

    /// Tile period in whole pixels, after clamping.
    pub fn tile_dimensions(&self) -> TileDimensions {
        let clamped = self.clamped();
        TileDimensions {
            width: clamped.tile_width.round() as u32,
            height: clamped.tile_height.round() as u32,
        }
    }
}

/// A partial options update from an options source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(alias = "fillStyle", skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<Color>,

    #[serde(alias = "fontSize", skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,

    #[serde(alias = "rotate", skip_serializing_if = "Option::is_none")]
    pub rotation_degrees: Option<f32>,

    #[serde(alias = "watermarkWidth", skip_serializing_if = "Option::is_none")]
    pub tile_width: Option<f32>,

    #[serde(alias = "watermarkHeight", skip_serializing_if = "Option::is_none")]
    pub tile_height: Option<f32>,
}

impl OptionsPatch {
    /// Parse a patch from the JSON payload a parameter form emits.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Layer `over` on top of `self`; fields set in `over` win.
    pub fn merge(self, over: OptionsPatch) -> OptionsPatch {
        OptionsPatch {
            text: over.text.or(self.text),
            fill_color: over.fill_color.or(self.fill_color),
            font_size: over.font_size.or(self.font_size),
            rotation_degrees: over.rotation_degrees.or(self.rotation_degrees),
            tile_width: over.tile_width.or(self.tile_width),
            tile_height: over.tile_height.or(self.tile_height),
        }
    }

    /// Resolve into a complete record over the documented defaults.
    pub fn resolve(&self) -> WatermarkOptions {
        let defaults = WatermarkOptions::default();
        WatermarkOptions {
            text: self.text.clone().unwrap_or(defaults.text),
            fill_color: self.fill_color.unwrap_or(defaults.fill_color),
            font_size: self.font_size.unwrap_or(defaults.font_size),
            rotation_degrees: self.rotation_degrees.unwrap_or(defaults.rotation_degrees),
            tile_width: self.tile_width.unwrap_or(defaults.tile_width),
            tile_height: self.tile_height.unwrap_or(defaults.tile_height),
        }
    }
}
