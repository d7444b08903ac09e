// Rendering scenarios on realistic image sizes

use super::fixtures::{controller, png};
use grapemark::watermark::{
    build_tile_layer, calculate_tile_cells, render_watermark, Color, ImageDimensions,
    WatermarkOptions,
};
use image::{Rgba, RgbaImage};

fn sample() -> WatermarkOptions {
    WatermarkOptions {
        text: "SAMPLE".to_string(),
        fill_color: "#00000080".parse::<Color>().unwrap(),
        font_size: 26.0,
        rotation_degrees: 20.0,
        tile_width: 252.0,
        tile_height: 180.0,
    }
}

#[tokio::test]
async fn test_sample_scenario_on_800_by_600() {
    let mut controller = controller();
    controller.add_image("photo.png", png(800, 600)).unwrap();
    let ticket = controller.set_options(sample());

    let bytes = controller.capture(&ticket).await.unwrap();
    let captured = image::load_from_memory(&bytes).unwrap();

    assert_eq!((captured.width(), captured.height()), (800, 600));
    assert_eq!(controller.surface().dimensions(), (800, 600));
}

#[test]
fn test_rotation_does_not_move_tile_centres() {
    let image = ImageDimensions {
        width: 800,
        height: 600,
    };
    let cell_centres: Vec<(f32, f32)> = calculate_tile_cells(&image, &sample().tile_dimensions())
        .iter()
        .map(|cell| cell.center())
        .collect();

    for rotation in [0.0, 20.0, 45.0] {
        let layer = build_tile_layer(
            &image,
            &WatermarkOptions {
                rotation_degrees: rotation,
                ..sample()
            },
        )
        .unwrap()
        .unwrap();
        let (w, h) = layer.stamp.dimensions();
        assert!(layer.tile_count() > 0);

        for p in &layer.positions {
            let centre = (p.x as f32 + w as f32 / 2.0, p.y as f32 + h as f32 / 2.0);
            assert!(
                cell_centres
                    .iter()
                    .any(|c| (c.0 - centre.0).abs() <= 1.0 && (c.1 - centre.1).abs() <= 1.0),
                "stamp centre {:?} is off the grid at {} degrees",
                centre,
                rotation
            );
        }
    }
}

#[test]
fn test_translucent_fill_keeps_base_visible() {
    let source = RgbaImage::from_pixel(400, 300, Rgba([255, 255, 255, 255]));
    let mut target = RgbaImage::new(1, 1);
    render_watermark(&mut target, &source, &sample()).unwrap();

    // Half-alpha black over white never goes fully dark
    let darkest = target.pixels().map(|p| p[0]).min().unwrap();
    assert!(darkest < 255);
    assert!(darkest >= 120);
}
