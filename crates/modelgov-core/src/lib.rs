//! ModelGov Core - governance policy engine for machine-learning models
//!
//! This crate decides whether a proposed change to a model's governance
//! state is permitted and records every decision:
//! - Entity graph of models, versions, datasets and their typed edges
//! - Dependency integrity checks (acyclicity, endpoint resolution)
//! - Compliance state machine with approval metadata
//! - Policy engine over a closed set of condition types
//! - Hash-chained audit log with a violation register
//!
//! Persistence, identity and transport are the caller's concern. Every
//! input arrives as a fully materialized snapshot and every decision is a
//! pure function of those inputs plus the audit log it appends to.

pub mod actions;
pub mod audit;
pub mod compliance;
pub mod config;
pub mod engine;
pub mod errors;
pub mod graph;
pub mod logging_facility;
pub mod metrics;
pub mod model;
pub mod policy_engine;
pub mod rules;

// Re-export commonly used types
pub use actions::{ProposalContext, ProposedAction};
pub use audit::{AuditLog, ComplianceLogEntry};
pub use config::GovernanceConfig;
pub use engine::{DecisionOutcome, GovernanceEngine, ProposalOutcome};
pub use errors::{ExError, ExErrorKind, GovError, Result};
pub use graph::{EntityGraph, GraphSnapshot};
pub use metrics::{InMemoryMetrics, MetricsSource};
pub use policy_engine::{EvaluationResult, PolicySet};
