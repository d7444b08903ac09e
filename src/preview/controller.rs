//! Preview controller.
//!
//! Owns the image list, the selection, the active options and the render
//! surface. Every change to selection or options schedules a render and
//! hands back a [`RenderTicket`]; callers that need the result wait on the
//! ticket with [`PreviewController::settled`] and read it with
//! [`PreviewController::capture`].

use super::images::{decode_preview, ImageEntry, ImageId, ImageList};
use super::surface::{
    encode_png, FrameContent, FrameStamp, PaintJob, PaintSource, RenderSurface,
};
use crate::constants::*;
use crate::error::WatermarkError;
use crate::watermark::{OptionsPatch, WatermarkOptions};
use bytes::Bytes;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

/// Label used for the placeholder frame in errors and logs.
const PLACEHOLDER_LABEL: &str = "placeholder";

/// Limits and sizes the controller works with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewSettings {
    pub max_images: usize,
    pub max_source_pixels: u64,
    pub placeholder_width: u32,
    pub placeholder_height: u32,
    /// Upper bound on waiting for a render to commit.
    pub settle_budget: Duration,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            max_images: DEFAULT_MAX_IMAGES,
            max_source_pixels: DEFAULT_MAX_SOURCE_PIXELS,
            placeholder_width: DEFAULT_PLACEHOLDER_WIDTH,
            placeholder_height: DEFAULT_PLACEHOLDER_HEIGHT,
            settle_budget: Duration::from_millis(DEFAULT_SETTLE_TIMEOUT_MS),
        }
    }
}

/// Handle to one scheduled render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTicket {
    pub generation: u64,
    pub content: FrameContent,
}

/// Image list, selection and options behind a single render surface.
#[derive(Debug)]
pub struct PreviewController {
    settings: PreviewSettings,
    images: ImageList,
    selected: Option<ImageId>,
    options: WatermarkOptions,
    surface: RenderSurface,
    generation: u64,
    current: RenderTicket,
}

impl PreviewController {
    /// Create a controller with default options.
    ///
    /// The placeholder is painted before this returns, so the surface is
    /// never empty once a controller exists.
    pub fn new(settings: PreviewSettings) -> Self {
        let surface = RenderSurface::new();
        let current = RenderTicket {
            generation: 1,
            content: FrameContent::Placeholder,
        };
        surface.paint(PaintJob {
            generation: current.generation,
            content: current.content,
            source: PaintSource::Placeholder {
                width: settings.placeholder_width,
                height: settings.placeholder_height,
            },
            options: WatermarkOptions::default(),
        });

        Self {
            images: ImageList::new(settings.max_images),
            settings,
            selected: None,
            options: WatermarkOptions::default(),
            surface,
            generation: current.generation,
            current,
        }
    }

    /// Take in a new image and decode it.
    ///
    /// A decoded image becomes the selection. An image that fails to decode
    /// stays in the list as failed and the error is returned.
    pub fn add_image(
        &mut self,
        name: impl Into<String>,
        bytes: Bytes,
    ) -> Result<ImageId, WatermarkError> {
        let name = name.into();
        let id = self.images.add_pending(name.clone(), bytes.clone())?;

        match decode_preview(&name, &bytes, self.settings.max_source_pixels) {
            Ok(preview) => {
                info!(
                    image = %name,
                    width = preview.width(),
                    height = preview.height(),
                    "Image loaded"
                );
                self.images.mark_loaded(id, preview)?;
                self.selected = Some(id);
                self.schedule_render();
                Ok(id)
            }
            Err(e) => {
                warn!(image = %name, error = %e, "Image failed to decode");
                self.images.mark_failed(id, e.to_string())?;
                Err(e)
            }
        }
    }

    /// Remove an image and fix up the selection in the same step.
    ///
    /// The selection moves to the last remaining entry (or the last loaded
    /// one if that entry is not loaded); with nothing left it is cleared.
    pub fn remove_image(&mut self, id: ImageId) -> Result<ImageEntry, WatermarkError> {
        let removed = self.images.remove(id)?;
        let next = self.images.reselection_candidate();
        debug!(image = %removed.display_name(), next = ?next, "Image removed");

        if next != self.selected {
            self.selected = next;
            self.schedule_render();
        }
        Ok(removed)
    }

    /// Make a loaded image the active one.
    ///
    /// Selecting the image that is already selected does not re-render and
    /// returns the current ticket.
    pub fn select(&mut self, id: ImageId) -> Result<RenderTicket, WatermarkError> {
        let entry = self.images.get(id).ok_or(WatermarkError::UnknownImage(id))?;
        if !entry.is_loaded() {
            return Err(WatermarkError::DecodeFailed {
                name: entry.display_name().to_string(),
                reason: "image is not loaded".to_string(),
            });
        }

        if self.selected == Some(id) {
            return Ok(self.current);
        }
        self.selected = Some(id);
        Ok(self.schedule_render())
    }

    /// Replace the active options and re-render.
    ///
    /// Options are stored as given; the renderer clamps them.
    pub fn set_options(&mut self, options: WatermarkOptions) -> RenderTicket {
        self.options = options;
        self.schedule_render()
    }

    /// Resolve a patch over the defaults and apply it.
    pub fn apply_patch(&mut self, patch: &OptionsPatch) -> RenderTicket {
        self.set_options(patch.resolve())
    }

    /// The selected entry, if any.
    pub fn selected(&self) -> Option<&ImageEntry> {
        self.selected.and_then(|id| self.images.get(id))
    }

    pub fn images(&self) -> &ImageList {
        &self.images
    }

    pub fn options(&self) -> &WatermarkOptions {
        &self.options
    }

    pub fn surface(&self) -> &RenderSurface {
        &self.surface
    }

    pub fn settings(&self) -> &PreviewSettings {
        &self.settings
    }

    /// Ticket of the most recently scheduled render.
    pub fn current_ticket(&self) -> RenderTicket {
        self.current
    }

    /// Wait until the ticket's render (or a newer one) has committed.
    pub async fn settled(&self, ticket: &RenderTicket) -> Result<FrameStamp, WatermarkError> {
        let label = self.label(ticket.content);
        self.surface
            .wait_for(ticket.generation, self.settings.settle_budget, &label)
            .await
    }

    /// Wait for the ticket's render and capture it as PNG bytes.
    ///
    /// The committed frame must show the ticket's content; anything else is
    /// a capture failure, never a silent capture of the wrong image.
    pub async fn capture(&self, ticket: &RenderTicket) -> Result<Bytes, WatermarkError> {
        let label = self.label(ticket.content);
        let stamp = self.settled(ticket).await?;
        debug!(
            image = %label,
            ticket = ticket.generation,
            committed = stamp.generation,
            "Render settled"
        );

        let pixels = self.surface.snapshot(ticket.content, &label)?;
        let capture_failed = |reason: String| WatermarkError::CaptureFailed {
            name: label.clone(),
            reason,
        };

        let encoded = tokio::task::spawn_blocking(move || encode_png(&pixels))
            .await
            .map_err(|e| capture_failed(format!("encoder task failed: {}", e)))?
            .map_err(|e| capture_failed(e.to_string()))?;
        if encoded.is_empty() {
            return Err(capture_failed("encoder produced no data".to_string()));
        }

        debug!(image = %label, bytes = encoded.len(), "Captured surface");
        Ok(Bytes::from(encoded))
    }

    fn label(&self, content: FrameContent) -> String {
        match content {
            FrameContent::Image(id) => self
                .images
                .get(id)
                .map(|e| e.display_name().to_string())
                .unwrap_or_else(|| id.to_string()),
            FrameContent::Placeholder | FrameContent::Blank => PLACEHOLDER_LABEL.to_string(),
        }
    }

    fn schedule_render(&mut self) -> RenderTicket {
        self.generation += 1;

        let loaded = self
            .selected
            .and_then(|id| self.images.get(id))
            .and_then(|entry| entry.preview().map(|p| (entry.id(), p.clone())));
        let (content, source) = match loaded {
            Some((id, preview)) => (FrameContent::Image(id), PaintSource::Image(preview)),
            None => (
                FrameContent::Placeholder,
                PaintSource::Placeholder {
                    width: self.settings.placeholder_width,
                    height: self.settings.placeholder_height,
                },
            ),
        };

        let ticket = RenderTicket {
            generation: self.generation,
            content,
        };
        let job = PaintJob {
            generation: ticket.generation,
            content,
            source,
            options: self.options.clone(),
        };

        let surface = self.surface.clone();
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || surface.paint(job));
            }
            Err(_) => {
                surface.paint(job);
            }
        }

        debug!(generation = ticket.generation, content = ?content, "Scheduled render");
        self.current = ticket;
        ticket
    }
}
