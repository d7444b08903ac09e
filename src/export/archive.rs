//! Archive builder: ordered named blobs packed into one ZIP.
//!
//! Entries are stored uncompressed with a fixed 1980-01-01 timestamp, so
//! identical ordered input yields a byte-identical archive.

use crate::error::WatermarkError;
use bytes::Bytes;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Accumulates `(name, blob)` pairs for one batch.
#[derive(Debug, Default, Clone)]
pub struct ArchiveBuilder {
    entries: Vec<(String, Bytes)>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a blob under `name`.
    ///
    /// A name already present keeps its original position and takes the new
    /// blob.
    pub fn add(&mut self, name: impl Into<String>, blob: Bytes) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => {
                debug!(name = %name, "Replacing archive entry");
                entry.1 = blob;
            }
            None => self.entries.push((name, blob)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry names in archive order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Pack every entry into a ZIP blob.
    pub fn finalize(self) -> Result<Bytes, WatermarkError> {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .last_modified_time(DateTime::default());

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, blob) in &self.entries {
            writer
                .start_file(name.as_str(), options)
                .map_err(|e| WatermarkError::Archive(format!("{}: {}", name, e)))?;
            writer
                .write_all(blob)
                .map_err(|e| WatermarkError::Archive(format!("{}: {}", name, e)))?;
        }

        let cursor = writer
            .finish()
            .map_err(|e| WatermarkError::Archive(e.to_string()))?;
        let bytes = cursor.into_inner();
        debug!(entries = self.entries.len(), bytes = bytes.len(), "Archive finalized");
        Ok(Bytes::from(bytes))
    }
}
