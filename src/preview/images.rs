//! Image entries and the ordered image list.
//!
//! Entries are created pending on intake, become loaded once their preview
//! raster is decoded (or failed if decoding is impossible), and are
//! immutable after that. Only loaded entries may be rendered.

use crate::error::WatermarkError;
use bytes::Bytes;
use image::RgbaImage;
use std::fmt;
use std::io::Cursor;
use std::sync::Arc;
use uuid::Uuid;

/// Opaque unique identifier of an image entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(Uuid);

impl ImageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Loading state of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageStatus {
    Pending,
    Loaded,
    Failed { reason: String },
}

/// One user-supplied image.
#[derive(Debug, Clone)]
pub struct ImageEntry {
    id: ImageId,
    display_name: String,
    status: ImageStatus,
    source: Bytes,
    preview: Option<Arc<RgbaImage>>,
}

impl ImageEntry {
    fn pending(display_name: String, source: Bytes) -> Self {
        Self {
            id: ImageId::new(),
            display_name,
            status: ImageStatus::Pending,
            source,
            preview: None,
        }
    }

    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn status(&self) -> &ImageStatus {
        &self.status
    }

    pub fn is_loaded(&self) -> bool {
        self.status == ImageStatus::Loaded
    }

    /// Raw bytes as supplied on intake.
    pub fn source(&self) -> &Bytes {
        &self.source
    }

    /// Decoded raster, present once loaded.
    pub fn preview(&self) -> Option<&Arc<RgbaImage>> {
        self.preview.as_ref()
    }

    /// Natural pixel dimensions of the preview, once loaded.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.preview.as_ref().map(|p| p.dimensions())
    }
}

/// Decode raw bytes into an RGBA preview raster.
///
/// The declared dimensions are checked against `max_pixels` before the
/// pixel data is decoded.
pub fn decode_preview(
    name: &str,
    bytes: &[u8],
    max_pixels: u64,
) -> Result<RgbaImage, WatermarkError> {
    let decode_failed = |reason: String| WatermarkError::DecodeFailed {
        name: name.to_string(),
        reason,
    };

    let reader = image::io::Reader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| decode_failed(e.to_string()))?;
    if reader.format().is_none() {
        return Err(decode_failed("unrecognised image format".to_string()));
    }

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| decode_failed(e.to_string()))?;
    let pixels = width as u64 * height as u64;
    if pixels == 0 {
        return Err(decode_failed("image has no pixels".to_string()));
    }
    if pixels > max_pixels {
        return Err(decode_failed(format!(
            "{}x{} exceeds the {} pixel limit",
            width, height, max_pixels
        )));
    }

    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|e| decode_failed(e.to_string()))
}

/// Ordered list of image entries with a capacity limit.
#[derive(Debug, Clone)]
pub struct ImageList {
    entries: Vec<ImageEntry>,
    max_images: usize,
}

impl ImageList {
    pub fn new(max_images: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_images,
        }
    }

    /// Append a pending entry. Fails when the list is full.
    pub fn add_pending(
        &mut self,
        display_name: impl Into<String>,
        source: Bytes,
    ) -> Result<ImageId, WatermarkError> {
        if self.entries.len() >= self.max_images {
            return Err(WatermarkError::TooManyImages {
                max: self.max_images,
            });
        }

        let entry = ImageEntry::pending(display_name.into(), source);
        let id = entry.id;
        self.entries.push(entry);
        Ok(id)
    }

    /// Transition a pending entry to loaded with its decoded preview.
    pub fn mark_loaded(&mut self, id: ImageId, preview: RgbaImage) -> Result<(), WatermarkError> {
        let entry = self.get_mut(id)?;
        entry.status = ImageStatus::Loaded;
        entry.preview = Some(Arc::new(preview));
        Ok(())
    }

    /// Transition a pending entry to failed.
    pub fn mark_failed(&mut self, id: ImageId, reason: impl Into<String>) -> Result<(), WatermarkError> {
        let entry = self.get_mut(id)?;
        entry.status = ImageStatus::Failed {
            reason: reason.into(),
        };
        entry.preview = None;
        Ok(())
    }

    /// Remove an entry, returning it.
    pub fn remove(&mut self, id: ImageId) -> Result<ImageEntry, WatermarkError> {
        let index = self
            .position(id)
            .ok_or(WatermarkError::UnknownImage(id))?;
        Ok(self.entries.remove(index))
    }

    pub fn get(&self, id: ImageId) -> Option<&ImageEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn get_mut(&mut self, id: ImageId) -> Result<&mut ImageEntry, WatermarkError> {
        self.entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(WatermarkError::UnknownImage(id))
    }

    pub fn position(&self, id: ImageId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// First entry with the given display name.
    pub fn find_by_name(&self, name: &str) -> Option<&ImageEntry> {
        self.entries.iter().find(|e| e.display_name == name)
    }

    /// Entry that should become selected after a removal: the last entry,
    /// or the last loaded one when the last entry cannot be rendered.
    pub fn reselection_candidate(&self) -> Option<ImageId> {
        match self.entries.last() {
            Some(last) if last.is_loaded() => Some(last.id),
            _ => self.entries.iter().rev().find(|e| e.is_loaded()).map(|e| e.id),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_images(&self) -> usize {
        self.max_images
    }
}
