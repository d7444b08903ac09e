//! Text watermark rendering.
//!
//! This module rasterises watermark text into an RGBA "stamp" that the
//! compositor repeats across the tile grid.
//!
//! # Features
//!
//! - Hex color parsing (#RGB, #RGBA, #RRGGBB and #RRGGBBAA formats)
//! - Alpha taken from the color itself, so the watermark stays translucent
//! - Rotation about the stamp's own center
//! - Embedded default font (no system font lookup)
//!
//! # Example
//!
//! ```ignore
//! use grapemark::watermark::text_renderer::{render_text, TextRenderOptions, parse_hex_color};
//!
//! let options = TextRenderOptions {
//!     text: "SAMPLE".to_string(),
//!     font_size: 26.0,
//!     color: parse_hex_color("#00000080")?,
//!     rotation_degrees: Some(20.0),
//! };
//!
//! let stamp = render_text(&options)?;
//! ```

use crate::error::WatermarkError;
use ab_glyph::{Font, FontRef, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Default embedded font (DejaVu Sans Mono).
/// Using a monospace font for predictable width calculations.
static DEFAULT_FONT: OnceLock<Option<FontRef<'static>>> = OnceLock::new();

const EMBEDDED_FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSansMono.ttf");

/// Get the default font, parsing it on first use.
fn get_default_font() -> Result<&'static FontRef<'static>, WatermarkError> {
    DEFAULT_FONT
        .get_or_init(|| FontRef::try_from_slice(EMBEDDED_FONT_DATA).ok())
        .as_ref()
        .ok_or_else(|| WatermarkError::Font("embedded font could not be parsed".to_string()))
}

/// RGBA color parsed from a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque white.
    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Opaque black.
    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    /// The same color with the alpha channel zeroed.
    pub fn transparent(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 0])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Color {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex_color(s)
    }
}

impl TryFrom<String> for Color {
    type Error = WatermarkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_hex_color(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Options for text rendering.
#[derive(Debug, Clone)]
pub struct TextRenderOptions {
    /// The text to render.
    pub text: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Text color, alpha included.
    pub color: Color,
    /// Rotation in degrees (clockwise on screen). None means no rotation.
    pub rotation_degrees: Option<f32>,
}

impl Default for TextRenderOptions {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 24.0,
            color: Color::new(0, 0, 0, 128),
            rotation_degrees: None,
        }
    }
}

/// Parse a hex color string into RGBA components.
///
/// Supports #RGB, #RGBA, #RRGGBB and #RRGGBBAA. Formats without an alpha
/// component are fully opaque.
///
/// # Examples
///
/// ```ignore
/// let white = parse_hex_color("#FFF")?;
/// assert_eq!(white, Color::new(255, 255, 255, 255));
///
/// let translucent = parse_hex_color("#00000080")?;
/// assert_eq!(translucent.a, 128);
/// ```
pub fn parse_hex_color(hex: &str) -> Result<Color, WatermarkError> {
    let digits = hex
        .trim()
        .strip_prefix('#')
        .ok_or_else(|| WatermarkError::InvalidColor(format!("'{}' must start with '#'", hex)))?;

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(WatermarkError::InvalidColor(format!(
            "'{}' contains non-hex characters",
            hex
        )));
    }

    let short = |i: usize| -> Result<u8, WatermarkError> {
        // Each short-form digit is doubled: 0xF -> 0xFF, 0xA -> 0xAA
        u8::from_str_radix(&digits[i..i + 1], 16)
            .map(|v| v * 17)
            .map_err(|_| WatermarkError::InvalidColor(format!("invalid hex digit in '{}'", hex)))
    };
    let long = |i: usize| -> Result<u8, WatermarkError> {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map_err(|_| WatermarkError::InvalidColor(format!("invalid hex digit in '{}'", hex)))
    };

    match digits.len() {
        3 => Ok(Color::new(short(0)?, short(1)?, short(2)?, 255)),
        4 => Ok(Color::new(short(0)?, short(1)?, short(2)?, short(3)?)),
        6 => Ok(Color::new(long(0)?, long(2)?, long(4)?, 255)),
        8 => Ok(Color::new(long(0)?, long(2)?, long(4)?, long(6)?)),
        n => Err(WatermarkError::InvalidColor(format!(
            "'{}' must be #RGB, #RGBA, #RRGGBB or #RRGGBBAA, got {} digits",
            hex, n
        ))),
    }
}

/// Calculate the dimensions of rendered text.
///
/// Returns (width, height) in pixels.
pub fn measure_text(text: &str, font_size: f32) -> Result<(u32, u32), WatermarkError> {
    let font = get_default_font()?;
    let scale = PxScale::from(font_size);
    let scaled_font = font.as_scaled(scale);

    let mut width = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for c in text.chars() {
        let glyph_id = scaled_font.glyph_id(c);

        if let Some(prev) = prev_glyph {
            width += scaled_font.kern(prev, glyph_id);
        }

        width += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    let height = scaled_font.height();

    // Small padding keeps anti-aliased edges inside the canvas
    let padding = 2;
    Ok((
        width.ceil() as u32 + padding,
        height.ceil() as u32 + padding,
    ))
}

/// Render text to an RGBA stamp.
///
/// The text is laid out horizontally in a tight canvas, then rotated about
/// the canvas center. The stamp's center is therefore the text's center
/// regardless of rotation.
pub fn render_text(options: &TextRenderOptions) -> Result<RgbaImage, WatermarkError> {
    if options.text.is_empty() {
        return Err(WatermarkError::Render("cannot render empty text".to_string()));
    }

    let font = get_default_font()?;
    let scale = PxScale::from(options.font_size);
    let scaled_font = font.as_scaled(scale);

    let (width, height) = measure_text(&options.text, options.font_size)?;
    let (width, height) = (width.max(1), height.max(1));

    // Every pixel carries the text color so bilinear sampling during
    // rotation only ever interpolates alpha.
    let mut image = RgbaImage::from_pixel(width, height, options.color.transparent());

    let alpha = options.color.a as f32;
    let baseline_y = 1.0 + scaled_font.ascent();

    let mut cursor_x = 1.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for c in options.text.chars() {
        let glyph_id = scaled_font.glyph_id(c);

        if let Some(prev) = prev_glyph {
            cursor_x += scaled_font.kern(prev, glyph_id);
        }

        let glyph = glyph_id.with_scale_and_position(scale, ab_glyph::point(cursor_x, baseline_y));

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();

            outlined.draw(|px, py, coverage| {
                let x = px as i32 + bounds.min.x as i32;
                let y = py as i32 + bounds.min.y as i32;

                if x >= 0 && y >= 0 && x < width as i32 && y < height as i32 {
                    let pixel = Rgba([
                        options.color.r,
                        options.color.g,
                        options.color.b,
                        (coverage.clamp(0.0, 1.0) * alpha) as u8,
                    ]);

                    // Overlapping glyph edges accumulate coverage
                    let existing = image.get_pixel(x as u32, y as u32);
                    let blended = blend_pixels(*existing, pixel);
                    image.put_pixel(x as u32, y as u32, blended);
                }
            });
        }

        cursor_x += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    match options.rotation_degrees {
        Some(degrees) if degrees != 0.0 => Ok(rotate_image(&image, degrees)),
        _ => Ok(image),
    }
}

/// Blend two RGBA pixels using alpha compositing.
fn blend_pixels(bottom: Rgba<u8>, top: Rgba<u8>) -> Rgba<u8> {
    let top_alpha = top[3] as f32 / 255.0;
    let bottom_alpha = bottom[3] as f32 / 255.0;

    let out_alpha = top_alpha + bottom_alpha * (1.0 - top_alpha);

    if out_alpha < 0.001 {
        return Rgba([top[0], top[1], top[2], 0]);
    }

    let blend = |t: u8, b: u8| -> u8 {
        let t = t as f32 / 255.0;
        let b = b as f32 / 255.0;
        let result = (t * top_alpha + b * bottom_alpha * (1.0 - top_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend(top[0], bottom[0]),
        blend(top[1], bottom[1]),
        blend(top[2], bottom[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}

/// Rotate an image clockwise (screen coordinates, y down) about its center.
///
/// The output canvas is the rotated bounding box, so its center maps onto
/// the source center.
pub fn rotate_image(image: &RgbaImage, degrees: f32) -> RgbaImage {
    let radians = degrees.to_radians();
    let cos = radians.cos();
    let sin = radians.sin();

    let src_w = image.width() as f32;
    let src_h = image.height() as f32;
    let cx = src_w / 2.0;
    let cy = src_h / 2.0;

    let corners = [
        (-cx, -cy),
        (src_w - cx, -cy),
        (-cx, src_h - cy),
        (src_w - cx, src_h - cy),
    ];

    let rotated_corners: Vec<(f32, f32)> = corners
        .iter()
        .map(|(x, y)| (x * cos - y * sin, x * sin + y * cos))
        .collect();

    let min_x = rotated_corners
        .iter()
        .map(|(x, _)| *x)
        .fold(f32::INFINITY, f32::min);
    let max_x = rotated_corners
        .iter()
        .map(|(x, _)| *x)
        .fold(f32::NEG_INFINITY, f32::max);
    let min_y = rotated_corners
        .iter()
        .map(|(_, y)| *y)
        .fold(f32::INFINITY, f32::min);
    let max_y = rotated_corners
        .iter()
        .map(|(_, y)| *y)
        .fold(f32::NEG_INFINITY, f32::max);

    let dst_w = ((max_x - min_x).ceil() as u32).max(1);
    let dst_h = ((max_y - min_y).ceil() as u32).max(1);

    let mut rotated = RgbaImage::new(dst_w, dst_h);

    let dst_cx = dst_w as f32 / 2.0;
    let dst_cy = dst_h as f32 / 2.0;

    for dy in 0..dst_h {
        for dx in 0..dst_w {
            // Inverse rotation maps the destination pixel center back into the source
            let rx = dx as f32 + 0.5 - dst_cx;
            let ry = dy as f32 + 0.5 - dst_cy;

            let sx = rx * cos + ry * sin + cx - 0.5;
            let sy = -rx * sin + ry * cos + cy - 0.5;

            if sx >= 0.0 && sx < src_w - 1.0 && sy >= 0.0 && sy < src_h - 1.0 {
                let x0 = sx.floor() as u32;
                let y0 = sy.floor() as u32;
                let x1 = x0 + 1;
                let y1 = y0 + 1;

                let fx = sx - x0 as f32;
                let fy = sy - y0 as f32;

                let p00 = image.get_pixel(x0, y0);
                let p10 = image.get_pixel(x1, y0);
                let p01 = image.get_pixel(x0, y1);
                let p11 = image.get_pixel(x1, y1);

                let interpolate = |c: usize| -> u8 {
                    let v = p00[c] as f32 * (1.0 - fx) * (1.0 - fy)
                        + p10[c] as f32 * fx * (1.0 - fy)
                        + p01[c] as f32 * (1.0 - fx) * fy
                        + p11[c] as f32 * fx * fy;

                    v.round().clamp(0.0, 255.0) as u8
                };

                rotated.put_pixel(
                    dx,
                    dy,
                    Rgba([
                        interpolate(0),
                        interpolate(1),
                        interpolate(2),
                        interpolate(3),
                    ]),
                );
            }
        }
    }

    rotated
}
