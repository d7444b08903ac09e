// Watermark option tests: bounds, defaults and patch layering

use grapemark::watermark::{Color, OptionsPatch, WatermarkOptions};
use rstest::rstest;

#[rstest]
#[case::below_min(5.0, 12.0)]
#[case::at_min(12.0, 12.0)]
#[case::inside(30.5, 30.5)]
#[case::at_max(64.0, 64.0)]
#[case::above_max(200.0, 64.0)]
fn test_font_size_clamps_to_nearest_bound(#[case] input: f32, #[case] expected: f32) {
    let options = WatermarkOptions {
        font_size: input,
        ..Default::default()
    };
    assert_eq!(options.clamped().font_size, expected);
}

#[rstest]
#[case(-10.0, 0.0)]
#[case(0.0, 0.0)]
#[case(20.0, 20.0)]
#[case(90.0, 45.0)]
fn test_rotation_clamps_to_nearest_bound(#[case] input: f32, #[case] expected: f32) {
    let options = WatermarkOptions {
        rotation_degrees: input,
        ..Default::default()
    };
    assert_eq!(options.clamped().rotation_degrees, expected);
}

#[rstest]
#[case(50.0, 50.0, 100.0, 100.0)]
#[case(252.0, 180.0, 252.0, 180.0)]
#[case(1000.0, 1000.0, 560.0, 360.0)]
fn test_tile_period_clamps(
    #[case] width: f32,
    #[case] height: f32,
    #[case] expected_width: f32,
    #[case] expected_height: f32,
) {
    let clamped = WatermarkOptions {
        tile_width: width,
        tile_height: height,
        ..Default::default()
    }
    .clamped();
    assert_eq!(clamped.tile_width, expected_width);
    assert_eq!(clamped.tile_height, expected_height);
}

#[rstest]
#[case("#000", Color::new(0, 0, 0, 255))]
#[case("#0008", Color::new(0, 0, 0, 136))]
#[case("#ff8000", Color::new(255, 128, 0, 255))]
#[case("#00000080", Color::new(0, 0, 0, 128))]
fn test_color_hex_forms(#[case] input: &str, #[case] expected: Color) {
    assert_eq!(input.parse::<Color>().unwrap(), expected);
}

#[rstest]
#[case("")]
#[case("#12")]
#[case("#gggggg")]
#[case("rgba(0,0,0,0.5)")]
fn test_color_rejects_malformed(#[case] input: &str) {
    assert!(input.parse::<Color>().is_err());
}

#[test]
fn test_color_display_round_trips() {
    let color = Color::new(18, 52, 86, 120);
    assert_eq!(color.to_string(), "#12345678");
    assert_eq!(color.to_string().parse::<Color>().unwrap(), color);
}

#[test]
fn test_config_then_cli_patch_layering() {
    let from_config: OptionsPatch =
        serde_yaml::from_str("text: CONFIG\nfontSize: 40\nwatermarkWidth: 300\n").unwrap();
    let from_cli = OptionsPatch {
        text: Some("CLI".to_string()),
        ..Default::default()
    };

    let options = from_config.merge(from_cli).resolve();

    assert_eq!(options.text, "CLI");
    assert_eq!(options.font_size, 40.0);
    assert_eq!(options.tile_width, 300.0);
    assert_eq!(options.tile_height, 180.0);
}

#[test]
fn test_empty_patch_resolves_to_defaults() {
    assert_eq!(OptionsPatch::default().resolve(), WatermarkOptions::default());
}
