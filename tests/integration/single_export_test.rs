// Single-image export to a directory

use super::fixtures::{controller, controller_with, gradient, png_bytes};
use grapemark::error::WatermarkError;
use grapemark::export::{BatchExporter, DirectorySink, ExportService, TracingNotifier};
use grapemark::watermark::{render_watermark, OptionsPatch};
use image::RgbaImage;
use std::sync::Arc;
use tempfile::TempDir;

fn directory_service(dir: &TempDir) -> ExportService {
    ExportService::new(
        Arc::new(DirectorySink::new(dir.path())),
        Arc::new(TracingNotifier),
        BatchExporter::default(),
    )
}

#[tokio::test]
async fn test_export_current_writes_selected_image() {
    let dir = TempDir::new().unwrap();
    let source = gradient(400, 300);
    let mut controller = controller();
    controller.add_image("holiday.png", png_bytes(&source)).unwrap();
    let ticket = controller.apply_patch(&OptionsPatch {
        text: Some("SAMPLE".to_string()),
        ..Default::default()
    });
    controller.settled(&ticket).await.unwrap();

    let report = directory_service(&dir).export_current(&controller).await.unwrap();

    assert_eq!(report.file_name, "holiday.png");
    let written = std::fs::read(dir.path().join("holiday.png")).unwrap();
    let decoded = image::load_from_memory(&written).unwrap().to_rgba8();

    // The export is exactly what the renderer paints for these options
    let mut expected = RgbaImage::new(1, 1);
    render_watermark(&mut expected, &source, controller.options()).unwrap();
    assert_eq!(decoded, expected);
}

#[tokio::test]
async fn test_export_current_with_no_images() {
    let dir = TempDir::new().unwrap();
    let controller = controller();

    let result = directory_service(&dir).export_current(&controller).await;

    assert!(matches!(result, Err(WatermarkError::EmptyInput)));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_export_all_writes_timestamped_archive() {
    let dir = TempDir::new().unwrap();
    let mut controller = controller_with(&[("a.png", 40, 40), ("b.png", 40, 40)]);

    let report = directory_service(&dir).export_all(&mut controller).await.unwrap();

    assert!(report.file_name.starts_with("watermark_"));
    assert!(report.file_name.ends_with(".zip"));
    let millis = report
        .file_name
        .trim_start_matches("watermark_")
        .trim_end_matches(".zip");
    assert!(millis.parse::<i64>().is_ok());
    assert!(dir.path().join(&report.file_name).exists());
}
