use crate::constants::*;
use crate::preview::PreviewSettings;
use crate::watermark::OptionsPatch;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable '{0}' is referenced but not set")]
    MissingEnvVar(String),

    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Watermark options, resolved over the defaults
    #[serde(default)]
    pub watermark: OptionsPatch,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub preview: PreviewConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_settle_timeout_ms() -> u64 {
    DEFAULT_SETTLE_TIMEOUT_MS
}

fn default_archive_prefix() -> String {
    DEFAULT_ARCHIVE_PREFIX.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory exported files are written to (default: ./watermarked)
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// How long to wait for a render to settle before capture (default: 1000)
    #[serde(default = "default_settle_timeout_ms")]
    pub settle_timeout_ms: u64,

    /// Batch archives are named `<prefix>_<unix-millis>.zip`
    #[serde(default = "default_archive_prefix")]
    pub archive_prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            settle_timeout_ms: default_settle_timeout_ms(),
            archive_prefix: default_archive_prefix(),
        }
    }
}

fn default_max_images() -> usize {
    DEFAULT_MAX_IMAGES
}

fn default_max_source_pixels() -> u64 {
    DEFAULT_MAX_SOURCE_PIXELS
}

fn default_placeholder_width() -> u32 {
    DEFAULT_PLACEHOLDER_WIDTH
}

fn default_placeholder_height() -> u32 {
    DEFAULT_PLACEHOLDER_HEIGHT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default = "default_max_images")]
    pub max_images: usize,

    /// Sources larger than this (width × height) are rejected on intake
    #[serde(default = "default_max_source_pixels")]
    pub max_source_pixels: u64,

    #[serde(default = "default_placeholder_width")]
    pub placeholder_width: u32,

    #[serde(default = "default_placeholder_height")]
    pub placeholder_height: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_images: default_max_images(),
            max_source_pixels: default_max_source_pixels(),
            placeholder_width: default_placeholder_width(),
            placeholder_height: default_placeholder_height(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when RUST_LOG is unset (default: info)
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, ConfigError> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            if std::env::var(var_name).is_err() {
                return Err(ConfigError::MissingEnvVar(var_name.to_string()));
            }
        }

        // Variables were checked above; one removed since reads as empty
        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        // An empty document is a config with every section defaulted
        if substituted.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(&substituted)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.export.settle_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "export.settle_timeout_ms must be greater than 0".to_string(),
            ));
        }

        let prefix = &self.export.archive_prefix;
        if prefix.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "export.archive_prefix cannot be empty".to_string(),
            ));
        }
        if prefix.contains('/') || prefix.contains('\\') {
            return Err(ConfigError::Invalid(format!(
                "export.archive_prefix '{}' must not contain path separators",
                prefix
            )));
        }

        if self.preview.max_images == 0 {
            return Err(ConfigError::Invalid(
                "preview.max_images must be at least 1".to_string(),
            ));
        }
        if self.preview.max_source_pixels == 0 {
            return Err(ConfigError::Invalid(
                "preview.max_source_pixels must be at least 1".to_string(),
            ));
        }
        if self.preview.placeholder_width == 0 || self.preview.placeholder_height == 0 {
            return Err(ConfigError::Invalid(
                "preview placeholder dimensions must be at least 1".to_string(),
            ));
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "logging.level cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn settle_budget(&self) -> Duration {
        Duration::from_millis(self.export.settle_timeout_ms)
    }

    /// Settings for a preview controller built from this config.
    pub fn preview_settings(&self) -> PreviewSettings {
        PreviewSettings {
            max_images: self.preview.max_images,
            max_source_pixels: self.preview.max_source_pixels,
            placeholder_width: self.preview.placeholder_width,
            placeholder_height: self.preview.placeholder_height,
            settle_budget: self.settle_budget(),
        }
    }
}
