//! Export service: runs single or batch exports, hands the result to a sink
//! and reports the outcome through a notifier.

use super::batch::BatchExporter;
use super::notify::Notifier;
use super::sink::ExportSink;
use crate::error::WatermarkError;
use crate::preview::PreviewController;
use std::sync::Arc;
use tracing::debug;

/// What an export delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub file_name: String,
    pub bytes: usize,
    /// Images contained in the delivered blob.
    pub entries: usize,
}

pub struct ExportService {
    sink: Arc<dyn ExportSink>,
    notifier: Arc<dyn Notifier>,
    batch: BatchExporter,
}

impl ExportService {
    pub fn new(
        sink: Arc<dyn ExportSink>,
        notifier: Arc<dyn Notifier>,
        batch: BatchExporter,
    ) -> Self {
        Self {
            sink,
            notifier,
            batch,
        }
    }

    /// Export the selected image under its display name.
    pub async fn export_current(
        &self,
        controller: &PreviewController,
    ) -> Result<ExportReport, WatermarkError> {
        let result = self.try_export_current(controller).await;
        self.report(result)
    }

    /// Export every image into one archive.
    pub async fn export_all(
        &self,
        controller: &mut PreviewController,
    ) -> Result<ExportReport, WatermarkError> {
        let result = self.try_export_all(controller).await;
        self.report(result)
    }

    async fn try_export_current(
        &self,
        controller: &PreviewController,
    ) -> Result<ExportReport, WatermarkError> {
        if controller.images().is_empty() {
            return Err(WatermarkError::EmptyInput);
        }
        let entry = controller.selected().ok_or(WatermarkError::NoSelection)?;
        let file_name = entry.display_name().to_string();

        let ticket = controller.current_ticket();
        debug!(image = %file_name, generation = ticket.generation, "Exporting current image");
        let blob = controller.capture(&ticket).await?;
        let bytes = blob.len();
        self.sink.save(&file_name, blob).await?;

        Ok(ExportReport {
            file_name,
            bytes,
            entries: 1,
        })
    }

    async fn try_export_all(
        &self,
        controller: &mut PreviewController,
    ) -> Result<ExportReport, WatermarkError> {
        let archive = self.batch.run(controller).await?;
        let bytes = archive.bytes.len();
        self.sink.save(&archive.file_name, archive.bytes).await?;

        Ok(ExportReport {
            file_name: archive.file_name,
            bytes,
            entries: archive.entries,
        })
    }

    fn report(
        &self,
        result: Result<ExportReport, WatermarkError>,
    ) -> Result<ExportReport, WatermarkError> {
        match &result {
            Ok(report) if report.entries == 1 => {
                self.notifier
                    .success(&format!("Saved {}", report.file_name));
            }
            Ok(report) => {
                self.notifier.success(&format!(
                    "Saved {} images to {}",
                    report.entries, report.file_name
                ));
            }
            Err(e) => self.notifier.failure(e),
        }
        result
    }
}
