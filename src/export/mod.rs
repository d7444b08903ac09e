//! Export paths: single image and batch archive.
//!
//! Both read the preview controller's render surface. The batch path walks
//! the image list in order, one render and capture at a time, and packs the
//! captures into a ZIP archive.

pub mod archive;
pub mod batch;
pub mod notify;
pub mod service;
pub mod sink;

pub use archive::ArchiveBuilder;
pub use batch::{archive_file_name, ArchiveBlob, BatchExporter};
pub use notify::{Notifier, TracingNotifier};
pub use service::{ExportReport, ExportService};
pub use sink::{DirectorySink, ExportSink, MemorySink};
