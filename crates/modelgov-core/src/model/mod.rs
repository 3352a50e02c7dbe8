pub mod dataset;
pub mod dependency;
pub mod governed_model;
pub mod policy;
pub mod version;

pub use dataset::{DataClassification, DataSensitivity, Dataset, DatasetLink, DatasetType};
pub use dependency::{DependencyType, ModelDependency, ModelRef};
pub use governed_model::{ApprovalMetadata, ComplianceStatus, Environment, Model, RiskLevel};
pub use policy::{ConditionType, Policy, PolicyScope, PolicyViolation};
pub use version::{EvaluationMetric, ModelVersion};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity types the engine resolves by identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Model,
    ModelVersion,
    Dataset,
    Policy,
}

impl EntityKind {
    /// Stable name, also used as the audit log entity type
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Model => "model",
            EntityKind::ModelVersion => "model_version",
            EntityKind::Dataset => "dataset",
            EntityKind::Policy => "policy",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
