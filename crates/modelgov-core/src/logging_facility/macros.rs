//! Lifecycle logging macros
//!
//! Every engine operation emits exactly one `start` event and exactly one
//! `end` or `end_error` event, all carrying `component` and `op`.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use modelgov_core::log_op_start;
/// log_op_start!("propose");
/// log_op_start!("propose", model_id = 7u64);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = modelgov_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = modelgov_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use modelgov_core::log_op_end;
/// log_op_end!("propose", duration_ms = 3u64, outcome = "accepted");
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = modelgov_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = modelgov_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation that ended in an error
///
/// The error is converted to `ExError` and tagged with the operation, so the
/// event carries its stable `err.kind` and `err.code` plus the rendered
/// `err.message`. Recoverable outcomes (policy breach, invalid transition)
/// log at `warn`, hard failures at `error`.
///
/// # Example
///
/// ```
/// # use modelgov_core::log_op_error;
/// # use modelgov_core::errors::GovError;
/// let err = GovError::InvalidAuditEntry { reason: "action is required".to_string() };
/// log_op_error!("record", err, duration_ms = 0u64);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {
        $crate::log_op_error!($op, $err, duration_ms = $duration,)
    };
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err = $crate::errors::ExError::from($err).with_op($op);
        if ex_err.kind().is_recoverable() {
            tracing::warn!(
                component = module_path!(),
                op = $op,
                event = modelgov_core_types::schema::EVENT_END_ERROR,
                duration_ms = $duration,
                err.kind = ?ex_err.kind(),
                err.code = ex_err.code(),
                err.message = %ex_err,
                $($field)*
            );
        } else {
            tracing::error!(
                component = module_path!(),
                op = $op,
                event = modelgov_core_types::schema::EVENT_END_ERROR,
                duration_ms = $duration,
                err.kind = ?ex_err.kind(),
                err.code = ex_err.code(),
                err.message = %ex_err,
                $($field)*
            );
        }
    }};
}
