//! Governance policies and the violations they produce
//!
//! Policies are organizational rules drawn from a small closed set of
//! condition types. Their scope decides which models they apply to:
//!
//! - `global`: every model
//! - `organization`: models whose `organization_id` equals the policy's
//! - `environment`: models whose `environment` equals the policy's bound environment

use chrono::{DateTime, Utc};
use modelgov_core_types::{ModelId, OrganizationId, PolicyId, UserId, VersionId};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::governed_model::Environment;

/// Breadth of a policy's applicability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyScope {
    Global,
    Organization,
    Environment,
}

impl PolicyScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyScope::Global => "global",
            PolicyScope::Organization => "organization",
            PolicyScope::Environment => "environment",
        }
    }
}

impl fmt::Display for PolicyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of conditions a policy can enforce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionType {
    /// Approval requires at least one evaluation metric on the current version
    RequireEvaluationBeforeApproval,
    /// High-risk models cannot move to a more exposed environment unless approved
    BlockHighRiskWithoutApproval,
    /// High-risk models cannot skip `under_review` on the way to `approved`
    RequireReviewForHighRisk,
}

impl ConditionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionType::RequireEvaluationBeforeApproval => {
                "require_evaluation_before_approval"
            }
            ConditionType::BlockHighRiskWithoutApproval => "block_high_risk_without_approval",
            ConditionType::RequireReviewForHighRisk => "require_review_for_high_risk",
        }
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An organizational governance rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub id: PolicyId,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    pub scope: PolicyScope,

    pub condition_type: ConditionType,

    #[serde(default = "default_active")]
    pub is_active: bool,

    /// Binding for `organization` scope
    #[serde(default)]
    pub organization_id: Option<OrganizationId>,

    /// Binding for `environment` scope
    #[serde(default)]
    pub environment: Option<Environment>,
}

fn default_active() -> bool {
    true
}

impl Policy {
    /// Create an active, globally scoped policy
    pub fn global(id: PolicyId, name: impl Into<String>, condition_type: ConditionType) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            scope: PolicyScope::Global,
            condition_type,
            is_active: true,
            organization_id: None,
            environment: None,
        }
    }

    /// Create an active policy bound to one organization
    pub fn for_organization(
        id: PolicyId,
        name: impl Into<String>,
        condition_type: ConditionType,
        organization_id: OrganizationId,
    ) -> Self {
        Self {
            scope: PolicyScope::Organization,
            organization_id: Some(organization_id),
            ..Self::global(id, name, condition_type)
        }
    }

    /// Create an active policy bound to one environment
    pub fn for_environment(
        id: PolicyId,
        name: impl Into<String>,
        condition_type: ConditionType,
        environment: Environment,
    ) -> Self {
        Self {
            scope: PolicyScope::Environment,
            environment: Some(environment),
            ..Self::global(id, name, condition_type)
        }
    }

    /// Soft-retire the policy; it stays in the set for audit references
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}

/// Immutable record of a breached policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyViolation {
    pub policy_id: PolicyId,
    pub condition_type: ConditionType,
    pub model_id: ModelId,
    #[serde(default)]
    pub model_version_id: Option<VersionId>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// Name of the attempted action (e.g. `compliance_transition`)
    pub action: String,
    /// Structured explanation of the breach
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
