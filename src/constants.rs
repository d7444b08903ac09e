// Constants module - centralized default values for configuration
//
// This module defines the documented bounds and defaults for watermark
// options, preview limits and export behaviour. Using constants instead of
// magic numbers keeps the option source, the renderer and the config layer
// in agreement.

// =============================================================================
// Watermark option bounds and defaults
// =============================================================================

/// Default watermark text
pub const DEFAULT_TEXT: &str = "Watermark";

/// Default fill colour (black at 50% alpha)
pub const DEFAULT_FILL_COLOR: &str = "#00000080";

/// Font size bounds in pixels
pub const FONT_SIZE_MIN: f32 = 12.0;
pub const FONT_SIZE_MAX: f32 = 64.0;
pub const DEFAULT_FONT_SIZE: f32 = 26.0;

/// Rotation bounds in degrees (clockwise)
pub const ROTATION_MIN: f32 = 0.0;
pub const ROTATION_MAX: f32 = 45.0;
pub const DEFAULT_ROTATION: f32 = 20.0;

/// Tile width bounds in pixels
pub const TILE_WIDTH_MIN: f32 = 100.0;
pub const TILE_WIDTH_MAX: f32 = 560.0;
pub const DEFAULT_TILE_WIDTH: f32 = 252.0;

/// Tile height bounds in pixels
pub const TILE_HEIGHT_MIN: f32 = 100.0;
pub const TILE_HEIGHT_MAX: f32 = 360.0;
pub const DEFAULT_TILE_HEIGHT: f32 = 180.0;

// =============================================================================
// Preview defaults
// =============================================================================

/// Maximum number of images held in the list at once
pub const DEFAULT_MAX_IMAGES: usize = 128;

/// Maximum decoded source size (100 megapixels, image bomb protection)
pub const DEFAULT_MAX_SOURCE_PIXELS: u64 = 100_000_000;

/// Placeholder surface dimensions used when nothing is selected
pub const DEFAULT_PLACEHOLDER_WIDTH: u32 = 800;
pub const DEFAULT_PLACEHOLDER_HEIGHT: u32 = 600;

/// Checker cell size of the placeholder pattern in pixels
pub const PLACEHOLDER_CHECKER_SIZE: u32 = 16;

// =============================================================================
// Export defaults
// =============================================================================

/// Upper bound on how long a capture waits for its render to settle
pub const DEFAULT_SETTLE_TIMEOUT_MS: u64 = 1000;

/// Archive file name prefix (`<prefix>_<unix-millis>.zip`)
pub const DEFAULT_ARCHIVE_PREFIX: &str = "watermark";

/// Default directory export blobs are written to
pub const DEFAULT_OUTPUT_DIR: &str = "watermarked";

// =============================================================================
// Logging defaults
// =============================================================================

/// Default log level when RUST_LOG is not set
pub const DEFAULT_LOG_LEVEL: &str = "info";
