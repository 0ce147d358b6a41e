#![allow(clippy::unwrap_used, clippy::expect_used)]

use hrdb_core::errors::{ExErrorKind, HrError};
use hrdb_core::logging_facility::test_capture::init_test_capture;
use hrdb_core::{log_op_end, log_op_error, log_op_start};
use hrdb_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    capture.assert_event_exists(op_name, EVENT_START);
}

#[test]
fn test_log_op_start_with_fields() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_fields_unique_2";

    log_op_start!(op_name, entity_id = 7);

    let events = capture.events_for(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].fields.get("entity_id"), Some(&"7".to_string()));
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_3";

    log_op_end!(op_name, duration_ms = 42);

    let end_events: Vec<_> = capture
        .events_for(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].fields.get("duration_ms"), Some(&"42".to_string()));
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_4";

    let err = HrError::YearOutOfRange {
        year: 1999,
        min: 2000,
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let error_events: Vec<_> = capture
        .events_for(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();

    assert_eq!(error_events.len(), 1);
    let event = &error_events[0];
    assert_eq!(
        event.fields.get("err_kind"),
        Some(&format!("{:?}", ExErrorKind::YearOutOfRange))
    );
    assert_eq!(
        event.fields.get("err_code"),
        Some(&"ERR_YEAR_OUT_OF_RANGE".to_string())
    );
    assert_eq!(event.level, tracing::Level::ERROR);
}

#[test]
fn test_component_is_module_path() {
    let capture = init_test_capture();
    let op_name = "test_component_unique_5";

    log_op_start!(op_name);

    let events = capture.events_for(op_name);
    assert_eq!(events[0].component.as_deref(), Some(module_path!()));
}
