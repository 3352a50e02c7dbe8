use chrono::{DateTime, Utc};
use modelgov_core_types::{ModelId, OrganizationId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::dataset::{DataClassification, DataSensitivity};
use crate::errors::{GovError, Result};

/// Ordinal classification of a model's potential harm
///
/// Variant order is severity order: `Unclassified < Minimal < Limited < High < Unacceptable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Unclassified,
    Minimal,
    Limited,
    High,
    Unacceptable,
}

impl RiskLevel {
    /// `High` or `Unacceptable`
    pub fn is_high(&self) -> bool {
        *self >= RiskLevel::High
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Unclassified => "unclassified",
            RiskLevel::Minimal => "minimal",
            RiskLevel::Limited => "limited",
            RiskLevel::High => "high",
            RiskLevel::Unacceptable => "unacceptable",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle stage of a model's governance approval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Draft,
    UnderReview,
    Approved,
    Retired,
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::Draft => "draft",
            ComplianceStatus::UnderReview => "under_review",
            ComplianceStatus::Approved => "approved",
            ComplianceStatus::Retired => "retired",
        }
    }

    /// Retired models accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, ComplianceStatus::Retired)
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deployment environment, ordered by exposure: `Dev < Test < Staging < Prod`
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Dev,
    Test,
    Staging,
    Prod,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Test => "test",
            Environment::Staging => "staging",
            Environment::Prod => "prod",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who approved a model, when, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalMetadata {
    pub approved_by: UserId,
    pub approved_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ApprovalMetadata {
    pub fn new(approved_by: UserId, approved_at: DateTime<Utc>) -> Self {
        Self {
            approved_by,
            approved_at,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A registered machine-learning model under governance
///
/// Invariant: `approval` is `Some` if and only if `compliance_status` is
/// `Approved`. Status changes go through [`crate::compliance`], which keeps
/// both fields in step; snapshots loaded from persistence are checked by
/// [`Model::check_approval_invariant`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: ModelId,

    pub name: String,

    /// Owning team or person
    pub owner: String,

    /// Organization the model was registered under
    #[serde(default)]
    pub organization_id: Option<OrganizationId>,

    pub risk_level: RiskLevel,

    pub compliance_status: ComplianceStatus,

    pub data_sensitivity: DataSensitivity,

    pub data_classification: DataClassification,

    #[serde(default)]
    pub environment: Environment,

    /// Present only while the model is approved
    #[serde(default)]
    pub approval: Option<ApprovalMetadata>,

    pub created_at: DateTime<Utc>,
}

impl Model {
    /// Create a draft, unclassified model in `dev`
    pub fn new(id: ModelId, name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            owner: owner.into(),
            organization_id: None,
            risk_level: RiskLevel::Unclassified,
            compliance_status: ComplianceStatus::Draft,
            data_sensitivity: DataSensitivity::Internal,
            data_classification: DataClassification::Internal,
            environment: Environment::Dev,
            approval: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_risk_level(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = risk_level;
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_organization(mut self, organization_id: OrganizationId) -> Self {
        self.organization_id = Some(organization_id);
        self
    }

    /// Restore a persisted status; approved models must carry their metadata
    ///
    /// # Errors
    ///
    /// Returns `ApprovalInvariantBroken` if `approval` is present for a
    /// non-approved status or missing for an approved one.
    pub fn with_status(
        mut self,
        status: ComplianceStatus,
        approval: Option<ApprovalMetadata>,
    ) -> Result<Self> {
        self.compliance_status = status;
        self.approval = approval;
        self.check_approval_invariant()?;
        Ok(self)
    }

    pub fn is_approved(&self) -> bool {
        self.compliance_status == ComplianceStatus::Approved
    }

    pub fn is_retired(&self) -> bool {
        self.compliance_status == ComplianceStatus::Retired
    }

    /// Approval metadata is set iff the status is approved
    pub fn approval_consistent(&self) -> bool {
        self.is_approved() == self.approval.is_some()
    }

    /// # Errors
    ///
    /// Returns `ApprovalInvariantBroken` when [`Model::approval_consistent`] is false.
    pub fn check_approval_invariant(&self) -> Result<()> {
        if self.approval_consistent() {
            Ok(())
        } else {
            Err(GovError::ApprovalInvariantBroken {
                model_id: self.id,
                status: self.compliance_status,
            })
        }
    }
}
