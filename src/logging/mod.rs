// Logging module for structured logging using the tracing crate

use crate::config::{LogFormat, LoggingConfig};
use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Build the event filter: `RUST_LOG` when set and valid, otherwise the
/// configured level.
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new(crate::constants::DEFAULT_LOG_LEVEL))
}

/// Initialize the global tracing subscriber.
///
/// Events go to stderr so exported data on stdout stays clean. Only the
/// first call installs a subscriber; later calls (or a subscriber installed
/// by someone else) are a no-op.
///
/// # Examples
///
/// ```
/// use grapemark::config::LoggingConfig;
/// use grapemark::logging::init_subscriber;
///
/// init_subscriber(&LoggingConfig::default());
/// tracing::info!("Application started");
/// ```
pub fn init_subscriber(config: &LoggingConfig) {
    INITIALIZED.get_or_init(|| {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(build_filter(config))
            .with_writer(std::io::stderr);

        let result = match config.format {
            LogFormat::Json => builder.json().try_init(),
            LogFormat::Pretty => builder.try_init(),
        };
        if let Err(e) = result {
            // Another global subscriber is already in place
            eprintln!("tracing subscriber not installed: {}", e);
        }
    });
}
