//! Sequential batch export.
//!
//! For each image in list order: select it, wait for its render to commit,
//! capture the surface and add the capture to the archive. The first failure
//! aborts the batch and nothing is produced.

use super::archive::ArchiveBuilder;
use crate::constants::DEFAULT_ARCHIVE_PREFIX;
use crate::error::WatermarkError;
use crate::preview::{ImageId, PreviewController};
use bytes::Bytes;
use chrono::Utc;
use tracing::{debug, info};

/// A finished archive ready to hand to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveBlob {
    pub file_name: String,
    pub bytes: Bytes,
    pub entries: usize,
}

/// `<prefix>_<unix-millis>.zip`
pub fn archive_file_name(prefix: &str, unix_millis: i64) -> String {
    format!("{}_{}.zip", prefix, unix_millis)
}

/// Drives one batch over a preview controller.
#[derive(Debug, Clone)]
pub struct BatchExporter {
    archive_prefix: String,
}

impl Default for BatchExporter {
    fn default() -> Self {
        Self::new(DEFAULT_ARCHIVE_PREFIX)
    }
}

impl BatchExporter {
    pub fn new(archive_prefix: impl Into<String>) -> Self {
        Self {
            archive_prefix: archive_prefix.into(),
        }
    }

    /// Export every image in order into one archive.
    ///
    /// Holding the controller mutably keeps selection and options fixed for
    /// the whole run. The selection is left on the last image.
    pub async fn run(&self, controller: &mut PreviewController) -> Result<ArchiveBlob, WatermarkError> {
        if controller.images().is_empty() {
            return Err(WatermarkError::EmptyInput);
        }

        // Snapshot the order up front; the list cannot change while we hold it
        let order: Vec<(ImageId, String)> = controller
            .images()
            .iter()
            .map(|e| (e.id(), e.display_name().to_string()))
            .collect();

        info!(images = order.len(), "Starting batch export");
        let mut archive = ArchiveBuilder::new();
        for (index, (id, name)) in order.iter().enumerate() {
            let ticket = controller.select(*id)?;
            let blob = controller.capture(&ticket).await?;
            debug!(index, image = %name, bytes = blob.len(), "Captured batch entry");
            archive.add(name.clone(), blob);
        }

        let entries = archive.len();
        let bytes = archive.finalize()?;
        let file_name = archive_file_name(&self.archive_prefix, Utc::now().timestamp_millis());
        info!(file = %file_name, entries, bytes = bytes.len(), "Batch archive ready");

        Ok(ArchiveBlob {
            file_name,
            bytes,
            entries,
        })
    }
}
