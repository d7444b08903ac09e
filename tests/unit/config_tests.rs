// Configuration loading tests

use grapemark::config::{Config, ConfigError, LogFormat};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

#[test]
fn test_full_config_example_parses() {
    let yaml = r##"
watermark:
  text: "SAMPLE"
  fill_color: "#00000080"
  font_size: 26
  rotation_degrees: 20
  tile_width: 252
  tile_height: 180
export:
  output_dir: "./out"
  settle_timeout_ms: 500
  archive_prefix: "batch"
preview:
  max_images: 16
  max_source_pixels: 4000000
  placeholder_width: 640
  placeholder_height: 480
logging:
  level: "debug"
  format: "json"
"##;

    let config = Config::from_yaml_with_env(yaml).unwrap();
    config.validate().unwrap();

    let options = config.watermark.resolve();
    assert_eq!(options.text, "SAMPLE");
    assert_eq!(options.rotation_degrees, 20.0);
    assert_eq!(config.export.output_dir, PathBuf::from("./out"));
    assert_eq!(config.export.archive_prefix, "batch");
    assert_eq!(config.preview.max_images, 16);
    assert_eq!(config.logging.format, LogFormat::Json);

    let settings = config.preview_settings();
    assert_eq!(settings.placeholder_width, 640);
    assert_eq!(settings.settle_budget.as_millis(), 500);
}

#[test]
fn test_env_var_substitution_in_watermark_text() {
    std::env::set_var("GRAPEMARK_TEST_OWNER", "ACME");
    let config =
        Config::from_yaml_with_env("watermark:\n  text: \"© ${GRAPEMARK_TEST_OWNER}\"\n").unwrap();
    assert_eq!(config.watermark.text.as_deref(), Some("© ACME"));
    std::env::remove_var("GRAPEMARK_TEST_OWNER");
}

#[test]
fn test_unknown_log_format_is_rejected() {
    let result = Config::from_yaml_with_env("logging:\n  format: xml\n");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_invalid_color_in_config_is_rejected() {
    let result = Config::from_yaml_with_env("watermark:\n  fillStyle: \"blue\"\n");
    assert!(result.is_err());
}

#[test]
fn test_validation_rejects_zero_max_images() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"preview:\n  max_images: 0\n").unwrap();
    file.flush().unwrap();

    let config = Config::from_file(file.path()).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("max_images"));
}

#[test]
fn test_validation_rejects_empty_prefix() {
    let config = Config::from_yaml_with_env("export:\n  archive_prefix: \"  \"\n").unwrap();
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}
