//! Core types shared across the model governance facilities
//!
//! This crate provides foundational types used by the governance engine,
//! its error facility and its logging facility:
//!
//! - **Identifiers**: opaque per-type entity ids (ModelId, VersionId, ...)
//! - **Correlation types**: RequestId, TraceId, RequestContext
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod ids;
pub mod schema;

pub use correlation::{RequestContext, RequestId, TraceId};
pub use ids::{DatasetId, MetricId, ModelId, OrganizationId, PolicyId, UserId, VersionId};
