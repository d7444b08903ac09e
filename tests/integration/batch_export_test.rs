// Batch export: ordered, all-or-nothing archives

use super::fixtures::{controller, controller_with, png, unzip};
use bytes::Bytes;
use grapemark::error::WatermarkError;
use grapemark::export::{BatchExporter, ExportService, MemorySink, TracingNotifier};
use std::sync::Arc;

#[tokio::test]
async fn test_batch_archive_keeps_list_order() {
    let mut controller = controller_with(&[("a.png", 120, 80), ("b.png", 90, 60), ("c.png", 200, 100)]);

    let blob = BatchExporter::default().run(&mut controller).await.unwrap();
    let entries = unzip(&blob.bytes);

    let names: Vec<_> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["a.png", "b.png", "c.png"]);
    assert!(entries.iter().all(|(_, data)| !data.is_empty()));
}

#[tokio::test]
async fn test_each_entry_is_its_own_image() {
    let mut controller = controller_with(&[("a.png", 120, 80), ("b.png", 90, 60), ("c.png", 200, 100)]);

    let blob = BatchExporter::default().run(&mut controller).await.unwrap();

    let dims: Vec<_> = unzip(&blob.bytes)
        .into_iter()
        .map(|(_, data)| {
            let img = image::load_from_memory(&data).unwrap();
            (img.width(), img.height())
        })
        .collect();
    assert_eq!(dims, vec![(120, 80), (90, 60), (200, 100)]);
}

#[tokio::test]
async fn test_batch_over_empty_list_produces_nothing() {
    let mut controller = controller();
    let sink = MemorySink::new();
    let service = ExportService::new(
        Arc::new(sink.clone()),
        Arc::new(TracingNotifier),
        BatchExporter::default(),
    );

    let result = service.export_all(&mut controller).await;

    assert!(matches!(result, Err(WatermarkError::EmptyInput)));
    assert!(sink.saved().is_empty());
}

#[tokio::test]
async fn test_failed_entry_aborts_whole_batch() {
    let mut controller = controller_with(&[("a.png", 50, 50)]);
    let _ = controller.add_image("corrupt.png", Bytes::from_static(b"\x89PNG broken"));
    controller.add_image("c.png", png(50, 50)).unwrap();

    let sink = MemorySink::new();
    let service = ExportService::new(
        Arc::new(sink.clone()),
        Arc::new(TracingNotifier),
        BatchExporter::default(),
    );
    let result = service.export_all(&mut controller).await;

    assert!(matches!(result, Err(WatermarkError::DecodeFailed { .. })));
    assert!(sink.saved().is_empty());
}

#[tokio::test]
async fn test_identical_batches_produce_identical_archives() {
    let images = [("a.png", 64, 64), ("b.png", 80, 40)];

    let mut first = controller_with(&images);
    let mut second = controller_with(&images);
    let a = BatchExporter::default().run(&mut first).await.unwrap();
    let b = BatchExporter::default().run(&mut second).await.unwrap();

    assert_eq!(a.bytes, b.bytes);
}

#[tokio::test]
async fn test_duplicate_display_names_keep_one_entry() {
    let mut controller = controller_with(&[("same.png", 40, 40), ("other.png", 40, 40), ("same.png", 60, 30)]);

    let blob = BatchExporter::default().run(&mut controller).await.unwrap();
    let entries = unzip(&blob.bytes);

    assert_eq!(blob.entries, 2);
    assert_eq!(entries[0].0, "same.png");
    let later = image::load_from_memory(&entries[0].1).unwrap();
    assert_eq!((later.width(), later.height()), (60, 30));
}

#[tokio::test]
async fn test_options_change_before_batch_applies_to_every_entry() {
    let mut plain = controller_with(&[("a.png", 300, 200)]);
    plain.set_options(grapemark::watermark::WatermarkOptions {
        text: String::new(),
        ..Default::default()
    });
    let mut stamped = controller_with(&[("a.png", 300, 200)]);

    let plain_blob = BatchExporter::default().run(&mut plain).await.unwrap();
    let stamped_blob = BatchExporter::default().run(&mut stamped).await.unwrap();

    assert_ne!(unzip(&plain_blob.bytes)[0].1, unzip(&stamped_blob.bytes)[0].1);
}
