// User-facing error message tests

use grapemark::error::WatermarkError;

#[test]
fn test_empty_input_and_capture_failure_messages_differ() {
    let empty = WatermarkError::EmptyInput;
    let capture = WatermarkError::CaptureFailed {
        name: "a.png".to_string(),
        reason: "encoder produced no data".to_string(),
    };

    assert_ne!(empty.user_message(), capture.user_message());
    assert!(capture.user_message().contains("a.png"));
    assert!(!empty.is_capture_failure());
    assert!(capture.is_capture_failure());
}

#[test]
fn test_settle_timeout_counts_as_capture_failure() {
    let err = WatermarkError::SettleTimeout {
        name: "b.png".to_string(),
        budget_ms: 1000,
    };
    assert!(err.is_capture_failure());
    assert_eq!(err.user_message(), "Capture failed for b.png");
}
