//! Proposed actions
//!
//! The inventory of mutations a caller can put before the governance engine.
//! Nothing here is applied directly; each action is turned into a
//! hypothetical post-mutation graph and evaluated by `GovernanceEngine`.

use chrono::{DateTime, Utc};
use modelgov_core_types::{DatasetId, ModelId, RequestContext, UserId, VersionId};
use serde::{Deserialize, Serialize};

use crate::model::{
    ApprovalMetadata, ComplianceStatus, DatasetType, DependencyType, Environment, ModelRef,
};

/// A mutation proposed against one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ProposedAction {
    /// Move a model to another compliance status
    ///
    /// `version_id` pins the version whose evaluations count toward approval;
    /// without it the model's latest version is used.
    Transition {
        model_id: ModelId,
        #[serde(default)]
        version_id: Option<VersionId>,
        to: ComplianceStatus,
        #[serde(default)]
        approval: Option<ApprovalMetadata>,
    },

    /// Move a model to another deployment environment
    Promote { model_id: ModelId, to: Environment },

    /// Record that a model (or one of its versions) uses a dataset
    LinkDataset {
        model: ModelRef,
        dataset_id: DatasetId,
        dataset_type: DatasetType,
    },

    /// Record that `child` was derived from `parent`
    AddDependency {
        parent: ModelRef,
        child: ModelRef,
        dependency_type: DependencyType,
    },
}

impl ProposedAction {
    /// The model whose governance state the action changes
    ///
    /// For a new dependency this is the child: it is the model whose lineage
    /// grows.
    pub fn target_model(&self) -> ModelId {
        match self {
            ProposedAction::Transition { model_id, .. }
            | ProposedAction::Promote { model_id, .. } => *model_id,
            ProposedAction::LinkDataset { model, .. } => model.model_id,
            ProposedAction::AddDependency { child, .. } => child.model_id,
        }
    }

    /// Name recorded as the audit `action` and on violations
    pub fn name(&self) -> &'static str {
        match self {
            ProposedAction::Transition { .. } => "compliance_transition",
            ProposedAction::Promote { .. } => "environment_promotion",
            ProposedAction::LinkDataset { .. } => "dataset_link",
            ProposedAction::AddDependency { .. } => "dependency_add",
        }
    }

    pub fn is_transition_to(&self, status: ComplianceStatus) -> bool {
        matches!(self, ProposedAction::Transition { to, .. } if *to == status)
    }
}

/// Who proposed the action, when, and under which request
///
/// Supplied by the caller: the identity collaborator provides `actor`, the
/// caller's clock provides `at`. Every timestamp the engine writes (audit
/// entries, violations) is taken from here, so re-running an evaluation with
/// the same context yields identical records.
#[derive(Debug, Clone, PartialEq)]
pub struct ProposalContext {
    pub actor: Option<UserId>,
    pub at: DateTime<Utc>,
    pub request: RequestContext,
}

impl ProposalContext {
    /// Anonymous proposal at `at` with a fresh request id
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            actor: None,
            at,
            request: RequestContext::new(),
        }
    }

    pub fn with_actor(mut self, actor: UserId) -> Self {
        self.actor = Some(actor);
        self
    }

    pub fn with_request(mut self, request: RequestContext) -> Self {
        self.request = request;
        self
    }
}
