use chrono::{DateTime, Utc};
use modelgov_core_types::{ModelId, VersionId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a child model was derived from its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyType {
    FineTunedFrom,
    EnsembleComponentOf,
    DistilledFrom,
    DerivedFrom,
}

impl DependencyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyType::FineTunedFrom => "fine_tuned_from",
            DependencyType::EnsembleComponentOf => "ensemble_component_of",
            DependencyType::DistilledFrom => "distilled_from",
            DependencyType::DerivedFrom => "derived_from",
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A model, optionally pinned to one of its versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelRef {
    pub model_id: ModelId,
    #[serde(default)]
    pub version_id: Option<VersionId>,
}

impl ModelRef {
    pub fn model(model_id: ModelId) -> Self {
        Self {
            model_id,
            version_id: None,
        }
    }

    pub fn version(model_id: ModelId, version_id: VersionId) -> Self {
        Self {
            model_id,
            version_id: Some(version_id),
        }
    }
}

/// Directed edge: `child` depends on (was derived from) `parent`
///
/// Viewed over model identities, the set of dependencies must stay acyclic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDependency {
    pub parent: ModelRef,
    pub child: ModelRef,
    pub dependency_type: DependencyType,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ModelDependency {
    pub fn new(parent: ModelRef, child: ModelRef, dependency_type: DependencyType) -> Self {
        Self {
            parent,
            child,
            dependency_type,
            notes: None,
            created_at: Utc::now(),
        }
    }

    /// Same endpoints and type, ignoring notes and timestamps
    pub fn same_edge(&self, other: &ModelDependency) -> bool {
        self.parent == other.parent
            && self.child == other.child
            && self.dependency_type == other.dependency_type
    }
}

impl fmt::Display for ModelDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -[{}]-> {}",
            self.parent.model_id, self.dependency_type, self.child.model_id
        )
    }
}
