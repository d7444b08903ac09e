// Logging initialisation tests

use grapemark::config::{LogFormat, LoggingConfig};
use grapemark::logging::init_subscriber;

#[test]
fn test_can_initialize_tracing_subscriber_twice() {
    init_subscriber(&LoggingConfig::default());
    // A second call must not panic even with a different format
    init_subscriber(&LoggingConfig {
        level: "debug".to_string(),
        format: LogFormat::Json,
    });

    tracing::info!(component = "logging_tests", "subscriber ready");
}
