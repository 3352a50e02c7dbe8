//! Structured logging facility
//!
//! - Single initialization point via `init(profile)`
//! - Lifecycle macros (`log_op_start!`, `log_op_end!`, `log_op_error!`) used
//!   only by the engine boundary
//! - Test capture mode for deterministic assertions
//!
//! Lower layers (graph, rules, audit) emit `tracing::debug!` only.
//!
//! # Usage
//!
//! ```rust
//! use modelgov_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
