//! Canonical logging macros
//!
//! The report pipeline logs three operations through these macros:
//!
//! | `op`              | start fields                    | end fields                      |
//! |-------------------|---------------------------------|---------------------------------|
//! | `generate_report` | `report_id`, `sections`, `mode` | `report_id`, `sections`, `rows_*` |
//! | `section_run`     | `section`, `report_id`          | `section`, `report_id`, `rows_*`  |
//! | `reconcile`       | `tables`                        | `rows_*`, `orphans_dropped`     |
//!
//! `rows_*` is the per-status row count (`rows_added`, `rows_deleted`,
//! `rows_modified`, `rows_unchanged`). Every event carries `component`, `op`
//! and `event`; end events add `duration_ms`, and error events add `err_kind`
//! and `err_code` from the failing `ExError`.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use confdiff_core::log_op_start;
/// log_op_start!("reconcile", tables = 2);
/// log_op_start!("section_run", section = "connectors", report_id = "r-1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::confdiff_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::confdiff_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use confdiff_core::log_op_end;
/// log_op_end!("reconcile", duration_ms = 42);
/// log_op_end!(
///     "section_run",
///     duration_ms = 42,
///     section = "connectors",
///     rows_added = 1,
///     rows_unchanged = 3
/// );
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::confdiff_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::confdiff_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// Accepts anything convertible into [`ExError`](crate::errors::ExError).
///
/// # Example
///
/// ```
/// # use confdiff_core::{log_op_error, errors::DiffError};
/// let err = DiffError::ShapeMismatch {
///     table: "rules".to_string(),
///     reason: "column Enabled differs".to_string(),
/// };
/// log_op_error!("section_run", err, duration_ms = 10, section = "rules");
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        use $crate::errors::ExError;
        let ex_err: ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::confdiff_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        use $crate::errors::ExError;
        let ex_err: ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::confdiff_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            $($field)*
        );
    }};
}
