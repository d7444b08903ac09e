//! Export outcome notifications.

use crate::error::WatermarkError;
use tracing::{error, info};

/// Tells the user how an export went.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn failure(&self, error: &WatermarkError);
}

/// Reports outcomes as structured log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(notice = message, "Export succeeded");
    }

    fn failure(&self, err: &WatermarkError) {
        error!(
            notice = %err.user_message(),
            error = %err,
            capture_failure = err.is_capture_failure(),
            "Export failed"
        );
    }
}
