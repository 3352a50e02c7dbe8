use chrono::{DateTime, TimeZone, Utc};
use modelgov_core::model::{
    ApprovalMetadata, ComplianceStatus, ConditionType, Model, ModelVersion, Policy, RiskLevel,
};
use modelgov_core::{EntityGraph, PolicySet, ProposalContext, ProposedAction};
use modelgov_core_types::{ModelId, PolicyId, UserId, VersionId};

#[allow(dead_code)]
pub const REVIEW_POLICY: PolicyId = PolicyId(1);
#[allow(dead_code)]
pub const EVALUATION_POLICY: PolicyId = PolicyId(2);
#[allow(dead_code)]
pub const EXPOSURE_POLICY: PolicyId = PolicyId(3);

/// Fixed decision time so audit entries and violations are reproducible
#[allow(dead_code)]
pub fn decision_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 10, 0, 0).unwrap()
}

/// Proposal by the reviewer user at the fixed decision time
#[allow(dead_code)]
pub fn reviewer_ctx() -> ProposalContext {
    ProposalContext::new(decision_time()).with_actor(UserId(100))
}

/// One global policy per condition type
#[allow(dead_code)]
pub fn standard_policies() -> PolicySet {
    PolicySet::from_policies([
        Policy::global(
            REVIEW_POLICY,
            "High-risk models need review",
            ConditionType::RequireReviewForHighRisk,
        ),
        Policy::global(
            EVALUATION_POLICY,
            "Evaluate before approval",
            ConditionType::RequireEvaluationBeforeApproval,
        ),
        Policy::global(
            EXPOSURE_POLICY,
            "No unapproved high-risk exposure",
            ConditionType::BlockHighRiskWithoutApproval,
        ),
    ])
    .expect("standard policies are valid")
}

#[allow(dead_code)]
pub fn approval() -> ApprovalMetadata {
    ApprovalMetadata::new(UserId(100), decision_time()).with_notes("reviewed")
}

/// A model with the given risk and status; approved models get metadata
#[allow(dead_code)]
pub fn governed_model(id: u64, risk: RiskLevel, status: ComplianceStatus) -> Model {
    let metadata = (status == ComplianceStatus::Approved).then(approval);
    Model::new(ModelId(id), format!("model-{}", id), "ml-platform")
        .with_risk_level(risk)
        .with_status(status, metadata)
        .expect("fixture model is consistent")
}

/// Graph holding the given models, each with one version `id * 10`
#[allow(dead_code)]
pub fn graph_of(models: impl IntoIterator<Item = Model>) -> EntityGraph {
    let mut graph = EntityGraph::new();
    for model in models {
        let version = ModelVersion::new(VersionId(model.id.get() * 10), model.id, "v1");
        graph.insert_model(model);
        graph.insert_version(version);
    }
    graph
}

#[allow(dead_code)]
pub fn transition(model_id: u64, to: ComplianceStatus) -> ProposedAction {
    ProposedAction::Transition {
        model_id: ModelId(model_id),
        version_id: None,
        to,
        approval: (to == ComplianceStatus::Approved).then(approval),
    }
}
