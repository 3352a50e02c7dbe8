//! Canonical schema constants for structured logging and audit details
//!
//! These constants keep field names consistent across log events, error
//! reporting and audit payloads.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Entity identifiers
pub const FIELD_MODEL_ID: &str = "model_id";
pub const FIELD_VERSION_ID: &str = "version_id";
pub const FIELD_DATASET_ID: &str = "dataset_id";
pub const FIELD_POLICY_ID: &str = "policy_id";
pub const FIELD_ACTOR_ID: &str = "actor_id";

// Decision fields
pub const FIELD_OUTCOME: &str = "outcome";
pub const FIELD_VIOLATION_COUNT: &str = "violation_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";
pub const FIELD_ERR_MESSAGE: &str = "err.message";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
