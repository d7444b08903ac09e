// Selection bookkeeping across intake and removal

use super::fixtures::{controller, controller_with, png};
use bytes::Bytes;
use grapemark::error::WatermarkError;
use grapemark::preview::{FrameContent, PreviewController, PreviewSettings};

fn selected_name(controller: &PreviewController) -> Option<String> {
    controller.selected().map(|e| e.display_name().to_string())
}

fn id_of(controller: &PreviewController, name: &str) -> grapemark::preview::ImageId {
    controller.images().find_by_name(name).unwrap().id()
}

#[test]
fn test_newly_loaded_image_becomes_selection() {
    let mut controller = controller();
    assert!(controller.selected().is_none());

    controller.add_image("a.png", png(20, 20)).unwrap();
    assert_eq!(selected_name(&controller).as_deref(), Some("a.png"));

    controller.add_image("b.png", png(20, 20)).unwrap();
    assert_eq!(selected_name(&controller).as_deref(), Some("b.png"));
}

#[test]
fn test_removing_selected_selects_last_remaining() {
    let mut controller = controller_with(&[("a.png", 10, 10), ("b.png", 10, 10), ("c.png", 10, 10)]);
    let b = id_of(&controller, "b.png");
    controller.select(b).unwrap();

    controller.remove_image(b).unwrap();

    assert_eq!(selected_name(&controller).as_deref(), Some("c.png"));
}

#[test]
fn test_removing_unselected_also_moves_to_last() {
    let mut controller = controller_with(&[("a.png", 10, 10), ("b.png", 10, 10), ("c.png", 10, 10)]);
    let a = id_of(&controller, "a.png");
    controller.select(a).unwrap();

    controller.remove_image(id_of(&controller, "b.png")).unwrap();

    assert_eq!(selected_name(&controller).as_deref(), Some("c.png"));
}

#[test]
fn test_removing_last_entry_clears_selection_and_shows_placeholder() {
    let mut controller = controller_with(&[("only.png", 10, 10)]);
    let only = id_of(&controller, "only.png");

    let removed = controller.remove_image(only).unwrap();

    assert_eq!(removed.display_name(), "only.png");
    assert!(controller.selected().is_none());
    assert!(controller.images().is_empty());
    assert_eq!(controller.surface().stamp().content, FrameContent::Placeholder);
    assert_eq!(controller.surface().dimensions(), (800, 600));
}

#[test]
fn test_failed_last_entry_is_skipped_on_reselection() {
    let mut controller = controller_with(&[("a.png", 10, 10), ("b.png", 10, 10)]);
    let _ = controller.add_image("broken.png", Bytes::from_static(b"garbage"));

    controller.remove_image(id_of(&controller, "a.png")).unwrap();

    assert_eq!(selected_name(&controller).as_deref(), Some("b.png"));
}

#[test]
fn test_intake_stops_at_capacity() {
    let mut controller = PreviewController::new(PreviewSettings {
        max_images: 2,
        ..Default::default()
    });
    controller.add_image("a.png", png(8, 8)).unwrap();
    controller.add_image("b.png", png(8, 8)).unwrap();

    let result = controller.add_image("c.png", png(8, 8));

    assert!(matches!(result, Err(WatermarkError::TooManyImages { max: 2 })));
    assert_eq!(controller.images().len(), 2);
}

#[test]
fn test_oversized_source_is_rejected_on_intake() {
    let mut controller = PreviewController::new(PreviewSettings {
        max_source_pixels: 100,
        ..Default::default()
    });

    let result = controller.add_image("big.png", png(20, 20));

    assert!(matches!(result, Err(WatermarkError::DecodeFailed { .. })));
    assert!(controller.selected().is_none());
}
