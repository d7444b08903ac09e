//! The shared render surface.
//!
//! One raster that every render writes and every capture reads. Each
//! committed frame carries a [`FrameStamp`] naming the render generation and
//! what it shows; stamps are published on a watch channel so readers can
//! wait for the exact render they need instead of sleeping.
//!
//! Paints are ordered by generation: a paint that finishes after a newer
//! one has already committed is dropped, so a slow render can never
//! overwrite a fresher frame.

use super::images::ImageId;
use crate::error::WatermarkError;
use crate::watermark::{render_placeholder, render_watermark, WatermarkOptions};
use image::{DynamicImage, ImageFormat, RgbaImage};
use parking_lot::RwLock;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

/// What a frame shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameContent {
    /// Nothing has been painted yet.
    Blank,
    /// The no-selection placeholder.
    Placeholder,
    /// A watermarked image.
    Image(ImageId),
}

/// Result of the paint that produced a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaintOutcome {
    Painted,
    Failed(String),
}

/// Identity of the committed frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameStamp {
    pub generation: u64,
    pub content: FrameContent,
    pub outcome: PaintOutcome,
}

/// Pixels a paint job draws from.
#[derive(Debug, Clone)]
pub enum PaintSource {
    Image(Arc<RgbaImage>),
    Placeholder { width: u32, height: u32 },
}

/// One render request.
#[derive(Debug, Clone)]
pub struct PaintJob {
    pub generation: u64,
    pub content: FrameContent,
    pub source: PaintSource,
    pub options: WatermarkOptions,
}

struct Frame {
    pixels: RgbaImage,
    stamp: FrameStamp,
}

/// Shared handle to the render surface.
#[derive(Clone)]
pub struct RenderSurface {
    frame: Arc<RwLock<Frame>>,
    stamps: Arc<watch::Sender<FrameStamp>>,
}

impl std::fmt::Debug for RenderSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let frame = self.frame.read();
        f.debug_struct("RenderSurface")
            .field("dimensions", &frame.pixels.dimensions())
            .field("stamp", &frame.stamp)
            .finish()
    }
}

impl Default for RenderSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSurface {
    /// Create an empty (0×0, blank) surface.
    pub fn new() -> Self {
        let stamp = FrameStamp {
            generation: 0,
            content: FrameContent::Blank,
            outcome: PaintOutcome::Painted,
        };
        let (sender, _) = watch::channel(stamp.clone());
        Self {
            frame: Arc::new(RwLock::new(Frame {
                pixels: RgbaImage::new(0, 0),
                stamp,
            })),
            stamps: Arc::new(sender),
        }
    }

    /// Stamp of the committed frame.
    pub fn stamp(&self) -> FrameStamp {
        self.frame.read().stamp.clone()
    }

    /// Dimensions of the committed frame.
    pub fn dimensions(&self) -> (u32, u32) {
        self.frame.read().pixels.dimensions()
    }

    /// Receiver that observes every committed stamp.
    pub fn subscribe(&self) -> watch::Receiver<FrameStamp> {
        self.stamps.subscribe()
    }

    /// Run a paint job and commit its result.
    ///
    /// Rendering happens outside the lock; only the swap is exclusive.
    /// Returns whether the frame was committed.
    pub fn paint(&self, job: PaintJob) -> bool {
        let mut pixels = RgbaImage::new(0, 0);
        let outcome = match &job.source {
            PaintSource::Image(source) => {
                match render_watermark(&mut pixels, source, &job.options) {
                    Ok(_) => PaintOutcome::Painted,
                    Err(e) => {
                        warn!(generation = job.generation, error = %e, "Render failed");
                        PaintOutcome::Failed(e.to_string())
                    }
                }
            }
            PaintSource::Placeholder { width, height } => {
                render_placeholder(&mut pixels, *width, *height);
                PaintOutcome::Painted
            }
        };

        let stamp = FrameStamp {
            generation: job.generation,
            content: job.content,
            outcome,
        };
        let keep_pixels = stamp.outcome == PaintOutcome::Painted;
        self.commit(stamp, keep_pixels.then_some(pixels))
    }

    /// Swap in a new frame if it is newer than the committed one.
    ///
    /// A failed paint publishes its stamp but leaves the previous pixels in
    /// place; capture refuses frames whose outcome is not `Painted`.
    fn commit(&self, stamp: FrameStamp, pixels: Option<RgbaImage>) -> bool {
        let mut frame = self.frame.write();
        if stamp.generation <= frame.stamp.generation {
            debug!(
                generation = stamp.generation,
                committed = frame.stamp.generation,
                "Dropped stale paint"
            );
            return false;
        }

        if let Some(pixels) = pixels {
            frame.pixels = pixels;
        }
        frame.stamp = stamp.clone();
        self.stamps.send_replace(stamp);
        true
    }

    /// Wait until a frame at or after `generation` is committed.
    ///
    /// Bounded by `budget`; `label` names the render in errors.
    pub async fn wait_for(
        &self,
        generation: u64,
        budget: Duration,
        label: &str,
    ) -> Result<FrameStamp, WatermarkError> {
        let mut receiver = self.subscribe();
        let wait = async {
            loop {
                {
                    let stamp = receiver.borrow_and_update();
                    if stamp.generation >= generation {
                        return Ok(stamp.clone());
                    }
                }
                if receiver.changed().await.is_err() {
                    return Err(WatermarkError::RenderTargetMissing);
                }
            }
        };

        match tokio::time::timeout(budget, wait).await {
            Ok(result) => result,
            Err(_) => Err(WatermarkError::SettleTimeout {
                name: label.to_string(),
                budget_ms: budget.as_millis() as u64,
            }),
        }
    }

    /// Copy the committed pixels, checking they show `expected`.
    pub fn snapshot(&self, expected: FrameContent, label: &str) -> Result<RgbaImage, WatermarkError> {
        let frame = self.frame.read();
        let capture_failed = |reason: String| WatermarkError::CaptureFailed {
            name: label.to_string(),
            reason,
        };

        if frame.pixels.width() == 0 || frame.pixels.height() == 0 {
            return Err(WatermarkError::RenderTargetMissing);
        }
        if let PaintOutcome::Failed(reason) = &frame.stamp.outcome {
            return Err(capture_failed(format!("render failed: {}", reason)));
        }
        if frame.stamp.content != expected {
            return Err(capture_failed(format!(
                "surface shows {:?} (generation {}), expected {:?}",
                frame.stamp.content, frame.stamp.generation, expected
            )));
        }

        Ok(frame.pixels.clone())
    }
}

/// Encode a captured frame as PNG.
pub fn encode_png(pixels: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(pixels.clone()).write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}
