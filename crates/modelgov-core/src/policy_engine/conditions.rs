//! Condition predicates
//!
//! One function per [`ConditionType`]. A predicate returns the violation
//! details when the proposed action breaches the condition and `None`
//! otherwise.

use serde_json::{json, Value};

use super::PolicyContext;
use crate::model::{ComplianceStatus, ConditionType};

/// Predicate signature shared by every condition
pub type Predicate = fn(&PolicyContext<'_>) -> Option<Value>;

impl ConditionType {
    /// Dispatch table entry for this condition
    pub fn predicate(self) -> Predicate {
        match self {
            ConditionType::RequireEvaluationBeforeApproval => require_evaluation_before_approval,
            ConditionType::BlockHighRiskWithoutApproval => block_high_risk_without_approval,
            ConditionType::RequireReviewForHighRisk => require_review_for_high_risk,
        }
    }
}

/// Approval needs at least one metric on the evaluated version
///
/// A model with no versions has nothing evaluated and is blocked.
fn require_evaluation_before_approval(ctx: &PolicyContext<'_>) -> Option<Value> {
    if !ctx.action.is_transition_to(ComplianceStatus::Approved) {
        return None;
    }
    let version_id = ctx.evaluated_version();
    let metric_count = version_id.map_or(0, |v| ctx.metrics.count_for_version(v));
    (metric_count == 0).then(|| {
        json!({
            "reason": "no evaluation metrics recorded for the current version",
            "version_id": version_id,
            "metric_count": metric_count,
        })
    })
}

/// High-risk models may not move to a more exposed environment until approved
fn block_high_risk_without_approval(ctx: &PolicyContext<'_>) -> Option<Value> {
    let (before, after) = (ctx.before, ctx.after);
    let advancing = after.environment > before.environment;
    let breached = advancing && after.risk_level.is_high() && !after.is_approved();
    breached.then(|| {
        json!({
            "reason": "high-risk model is not approved for a higher-exposure environment",
            "risk_level": after.risk_level,
            "compliance_status": after.compliance_status,
            "from_environment": before.environment,
            "to_environment": after.environment,
        })
    })
}

/// High-risk models must pass through `under_review` before approval
fn require_review_for_high_risk(ctx: &PolicyContext<'_>) -> Option<Value> {
    let (before, after) = (ctx.before, ctx.after);
    let skips_review = before.compliance_status == ComplianceStatus::Draft
        && after.compliance_status == ComplianceStatus::Approved;
    (skips_review && after.risk_level.is_high()).then(|| {
        json!({
            "reason": "high-risk model cannot be approved without review",
            "risk_level": after.risk_level,
            "from": before.compliance_status,
            "to": after.compliance_status,
        })
    })
}
