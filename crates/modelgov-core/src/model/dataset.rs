use chrono::{DateTime, Utc};
use modelgov_core_types::{DatasetId, ModelId, OrganizationId, VersionId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Regulatory sensitivity of the data a model or dataset touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSensitivity {
    Public,
    Internal,
    /// Personally identifiable information
    Pii,
    /// Protected health information
    Phi,
    /// Payment card industry data
    Pci,
}

/// Enterprise data classification tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataClassification {
    Public,
    Internal,
    Confidential,
    Restricted,
}

/// Role a dataset plays for a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetType {
    Training,
    Validation,
    Test,
    Inference,
}

impl DatasetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetType::Training => "training",
            DatasetType::Validation => "validation",
            DatasetType::Test => "test",
            DatasetType::Inference => "inference",
        }
    }
}

impl fmt::Display for DatasetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A data source used by models; not owned by any model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: DatasetId,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    pub data_sensitivity: DataSensitivity,

    pub data_classification: DataClassification,

    #[serde(default)]
    pub organization_id: Option<OrganizationId>,

    /// Soft-retirement timestamp; retired datasets cannot be newly linked
    #[serde(default)]
    pub retired_at: Option<DateTime<Utc>>,
}

impl Dataset {
    pub fn new(id: DatasetId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            data_sensitivity: DataSensitivity::Internal,
            data_classification: DataClassification::Internal,
            organization_id: None,
            retired_at: None,
        }
    }

    pub fn with_sensitivity(
        mut self,
        sensitivity: DataSensitivity,
        classification: DataClassification,
    ) -> Self {
        self.data_sensitivity = sensitivity;
        self.data_classification = classification;
        self
    }

    pub fn is_retired(&self) -> bool {
        self.retired_at.is_some()
    }
}

/// Typed edge from a model (optionally a pinned version) to a dataset
///
/// Links are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetLink {
    pub model_id: ModelId,

    #[serde(default)]
    pub version_id: Option<VersionId>,

    pub dataset_id: DatasetId,

    pub dataset_type: DatasetType,

    #[serde(default)]
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl DatasetLink {
    pub fn new(model_id: ModelId, dataset_id: DatasetId, dataset_type: DatasetType) -> Self {
        Self {
            model_id,
            version_id: None,
            dataset_id,
            dataset_type,
            notes: None,
            created_at: Utc::now(),
        }
    }

    pub fn pinned_to(mut self, version_id: VersionId) -> Self {
        self.version_id = Some(version_id);
        self
    }

    /// Same endpoints and role, ignoring notes and timestamps
    pub fn same_edge(&self, other: &DatasetLink) -> bool {
        self.model_id == other.model_id
            && self.version_id == other.version_id
            && self.dataset_id == other.dataset_id
            && self.dataset_type == other.dataset_type
    }
}
