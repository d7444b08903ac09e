//! Error types for rendering, preview and export.
//!
//! Every failure here is surfaced to the user through the notifier; none of
//! them is retried. `user_message` gives the short text a host shows, while
//! `Display` carries the full detail for logs.

use crate::preview::ImageId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while rendering or exporting watermarked images.
#[derive(Error, Debug)]
pub enum WatermarkError {
    /// An export was requested while the image list is empty
    #[error("no images to export")]
    EmptyInput,

    /// A single export was requested but no image is selected
    #[error("no image is selected")]
    NoSelection,

    /// The render surface has no pixels or its completion channel is gone
    #[error("render surface is not available")]
    RenderTargetMissing,

    /// The surface produced no capturable data for an entry
    #[error("capture failed for '{name}': {reason}")]
    CaptureFailed { name: String, reason: String },

    /// The render for an entry did not settle within the budget
    #[error("render for '{name}' did not settle within {budget_ms}ms")]
    SettleTimeout { name: String, budget_ms: u64 },

    /// An image could not be decoded, or a non-loaded image was used
    #[error("failed to decode '{name}': {reason}")]
    DecodeFailed { name: String, reason: String },

    /// The id does not name an image in the list
    #[error("unknown image id {0}")]
    UnknownImage(ImageId),

    /// The image list is full
    #[error("image list is full ({max} images)")]
    TooManyImages { max: usize },

    /// A colour string could not be parsed
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Text could not be rasterised
    #[error("failed to render text watermark: {0}")]
    Render(String),

    /// The renderer was handed a source with no pixels
    #[error("invalid source image: {0}")]
    InvalidSource(String),

    /// The embedded font could not be loaded
    #[error("font error: {0}")]
    Font(String),

    /// Packaging the archive failed
    #[error("archive error: {0}")]
    Archive(String),

    /// Writing an export blob failed
    #[error("failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WatermarkError {
    /// Short message suitable for showing to the user.
    ///
    /// "No images" and "capture failed" conditions get distinct messages so
    /// the user can tell an empty list apart from a broken render.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyInput => "Open one or more images before downloading".to_string(),
            Self::NoSelection => "Select an image before downloading".to_string(),
            Self::RenderTargetMissing => {
                "Capture failed: the drawing surface is not available".to_string()
            }
            Self::CaptureFailed { name, .. } | Self::SettleTimeout { name, .. } => {
                format!("Capture failed for {}", name)
            }
            Self::DecodeFailed { name, .. } => format!("Could not read image {}", name),
            other => other.to_string(),
        }
    }

    /// Whether the error belongs to the capture family (surface or encoding).
    pub fn is_capture_failure(&self) -> bool {
        matches!(
            self,
            Self::RenderTargetMissing | Self::CaptureFailed { .. } | Self::SettleTimeout { .. }
        )
    }
}
