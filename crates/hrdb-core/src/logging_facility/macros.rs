//! Boundary logging macros
//!
//! A write operation emits exactly one `start` event and then either one
//! `end` or one `end_error` event, all carrying the same `op`. Any extra
//! `key = value` fields are passed through to `tracing`. Callers need
//! `tracing` in their own dependency list.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use hrdb_core::log_op_start;
/// log_op_start!("employee_create");
/// log_op_start!("employee_delete", entity_id = 7);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {{
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            $($($field)*)?
        );
    }};
}

/// Log the successful end of an operation with its duration
///
/// # Example
///
/// ```
/// # use hrdb_core::log_op_end;
/// log_op_end!("employee_create", duration_ms = 3);
/// log_op_end!("employee_get_all", duration_ms = 1, row_count = 12);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        );
    }};
}

/// Log a failed operation with the error's kind and stable code
///
/// `$err` is anything convertible into [`ExError`](crate::errors::ExError).
///
/// # Example
///
/// ```
/// # use hrdb_core::{log_op_error, errors::HrError};
/// let err = HrError::MissingId { entity: "employee", op: "update" };
/// log_op_error!("employee_update", err, duration_ms = 0);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            $($($field)*)?
        );
    }};
}
