//! Export sinks: where finished blobs go.

use crate::error::WatermarkError;
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Receives exported blobs (a single image or a batch archive).
#[async_trait]
pub trait ExportSink: Send + Sync {
    /// Deliver `blob` under `file_name`.
    async fn save(&self, file_name: &str, blob: Bytes) -> Result<(), WatermarkError>;
}

/// Writes blobs into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a blob named `file_name` is written to.
    ///
    /// Only the final path component of `file_name` is used, so a display
    /// name can never escape the output directory.
    pub fn target_path(&self, file_name: &str) -> PathBuf {
        let base = Path::new(file_name)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "export".into());
        self.root.join(base)
    }
}

#[async_trait]
impl ExportSink for DirectorySink {
    async fn save(&self, file_name: &str, blob: Bytes) -> Result<(), WatermarkError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| WatermarkError::Io {
                path: self.root.clone(),
                source,
            })?;

        let path = self.target_path(file_name);
        tokio::fs::write(&path, &blob)
            .await
            .map_err(|source| WatermarkError::Io {
                path: path.clone(),
                source,
            })?;

        info!(path = %path.display(), bytes = blob.len(), "Export written");
        Ok(())
    }
}

/// Keeps blobs in memory, in delivery order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    saved: Arc<Mutex<Vec<(String, Bytes)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything saved so far.
    pub fn saved(&self) -> Vec<(String, Bytes)> {
        self.saved.lock().clone()
    }
}

#[async_trait]
impl ExportSink for MemorySink {
    async fn save(&self, file_name: &str, blob: Bytes) -> Result<(), WatermarkError> {
        self.saved.lock().push((file_name.to_string(), blob));
        Ok(())
    }
}
