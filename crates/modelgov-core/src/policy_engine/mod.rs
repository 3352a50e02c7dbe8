//! Policy engine
//!
//! Evaluates the active policy set against one proposed action. Evaluation
//! is a pure function of its inputs:
//!
//! - policies are visited in ascending id order, so the violation list is
//!   reproducible
//! - scope is matched against the model as it would be after the action
//! - every matched, active policy whose condition is breached contributes one
//!   violation; any violation makes the action disallowed
//!
//! Recording violations is the caller's job (see `GovernanceEngine`), which
//! keeps this module free of side effects.

pub mod conditions;
pub mod policy_set;
pub mod scope;

pub use conditions::Predicate;
pub use policy_set::PolicySet;

use modelgov_core_types::{ModelId, VersionId};
use serde::{Deserialize, Serialize};

use crate::actions::{ProposalContext, ProposedAction};
use crate::errors::{GovError, Result};
use crate::graph::EntityGraph;
use crate::metrics::MetricsSource;
use crate::model::{Model, PolicyViolation};

/// Everything a condition predicate may look at
pub struct PolicyContext<'a> {
    pub action: &'a ProposedAction,
    /// Target model before the action
    pub before: &'a Model,
    /// Target model as it would be after the action
    pub after: &'a Model,
    /// Hypothetical post-mutation graph
    pub graph: &'a EntityGraph,
    pub metrics: &'a dyn MetricsSource,
    pub proposal: &'a ProposalContext,
}

impl PolicyContext<'_> {
    /// Version the action is judged against
    ///
    /// The version named by the action when it names one, otherwise the
    /// target model's latest version.
    pub fn evaluated_version(&self) -> Option<VersionId> {
        let pinned = match self.action {
            ProposedAction::Transition { version_id, .. } => *version_id,
            ProposedAction::LinkDataset { model, .. } => model.version_id,
            ProposedAction::AddDependency { child, .. } => child.version_id,
            ProposedAction::Promote { .. } => None,
        };
        pinned.or_else(|| self.graph.latest_version(self.after.id).map(|v| v.id))
    }
}

/// Outcome of evaluating one action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub allowed: bool,
    /// Violations in ascending policy id order
    pub violations: Vec<PolicyViolation>,
}

impl EvaluationResult {
    fn from_violations(violations: Vec<PolicyViolation>) -> Self {
        Self {
            allowed: violations.is_empty(),
            violations,
        }
    }

    /// Convert a denial into `PolicyBreach`
    ///
    /// # Errors
    ///
    /// Returns `PolicyBreach` carrying the violations if the action was denied.
    pub fn into_result(self, model_id: ModelId) -> Result<Vec<PolicyViolation>> {
        if self.allowed {
            Ok(self.violations)
        } else {
            Err(GovError::PolicyBreach {
                model_id,
                violations: self.violations,
            })
        }
    }
}

/// Evaluate every active, applicable policy against the action
pub fn evaluate_policies(ctx: &PolicyContext<'_>, policies: &PolicySet) -> EvaluationResult {
    let mut violations = Vec::new();

    for policy in policies
        .active()
        .filter(|p| scope::applies_to(p, ctx.after))
    {
        let predicate = policy.condition_type.predicate();
        let Some(details) = predicate(ctx) else {
            continue;
        };

        tracing::debug!(
            policy_id = %policy.id,
            condition = %policy.condition_type,
            model_id = %ctx.after.id,
            "policy condition breached"
        );
        violations.push(PolicyViolation {
            policy_id: policy.id,
            condition_type: policy.condition_type,
            model_id: ctx.after.id,
            model_version_id: ctx.evaluated_version(),
            user_id: ctx.proposal.actor,
            action: ctx.action.name().to_string(),
            details,
            created_at: ctx.proposal.at,
        });
    }

    EvaluationResult::from_violations(violations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::InMemoryMetrics;
    use crate::model::{
        ApprovalMetadata, ComplianceStatus, ConditionType, Environment, EvaluationMetric,
        ModelVersion, Policy, RiskLevel,
    };
    use chrono::{TimeZone, Utc};
    use modelgov_core_types::{MetricId, PolicyId, UserId};

    fn all_conditions() -> PolicySet {
        PolicySet::from_policies([
            Policy::global(
                PolicyId(30),
                "review",
                ConditionType::RequireReviewForHighRisk,
            ),
            Policy::global(
                PolicyId(10),
                "evaluate",
                ConditionType::RequireEvaluationBeforeApproval,
            ),
            Policy::global(
                PolicyId(20),
                "exposure",
                ConditionType::BlockHighRiskWithoutApproval,
            ),
        ])
        .unwrap()
    }

    fn proposal() -> ProposalContext {
        ProposalContext::new(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap())
            .with_actor(UserId(5))
    }

    fn graph_with(model: &Model) -> EntityGraph {
        let mut graph = EntityGraph::new();
        graph.insert_model(model.clone());
        graph.insert_version(ModelVersion::new(VersionId(100), model.id, "v1"));
        graph
    }

    fn run(
        action: &ProposedAction,
        before: &Model,
        after: &Model,
        metrics: &InMemoryMetrics,
    ) -> EvaluationResult {
        let graph = graph_with(after);
        let proposal = proposal();
        let ctx = PolicyContext {
            action,
            before,
            after,
            graph: &graph,
            metrics,
            proposal: &proposal,
        };
        evaluate_policies(&ctx, &all_conditions())
    }

    fn approve(model: &Model) -> (ProposedAction, Model) {
        let approval = ApprovalMetadata::new(UserId(5), Utc::now());
        let mut after = model.clone();
        after.compliance_status = ComplianceStatus::Approved;
        after.approval = Some(approval.clone());
        let action = ProposedAction::Transition {
            model_id: model.id,
            version_id: None,
            to: ComplianceStatus::Approved,
            approval: Some(approval),
        };
        (action, after)
    }

    #[test]
    fn test_direct_high_risk_approval_breaches_in_id_order() {
        let model = Model::new(ModelId(1), "m", "o").with_risk_level(RiskLevel::High);
        let (action, after) = approve(&model);

        let result = run(&action, &model, &after, &InMemoryMetrics::new());

        assert!(!result.allowed);
        let ids: Vec<PolicyId> = result.violations.iter().map(|v| v.policy_id).collect();
        assert_eq!(ids, vec![PolicyId(10), PolicyId(30)]);
        assert_eq!(result.violations[0].model_version_id, Some(VersionId(100)));
        assert_eq!(result.violations[1].user_id, Some(UserId(5)));
        assert_eq!(result.violations[1].action, "compliance_transition");
    }

    #[test]
    fn test_evaluated_approval_passes() {
        let model = Model::new(ModelId(1), "m", "o")
            .with_risk_level(RiskLevel::High)
            .with_status(ComplianceStatus::UnderReview, None)
            .unwrap();
        let (action, after) = approve(&model);
        let metrics: InMemoryMetrics = [EvaluationMetric::new(
            MetricId(1),
            VersionId(100),
            "auc",
            0.9,
        )]
        .into_iter()
        .collect();

        let result = run(&action, &model, &after, &metrics);
        assert!(result.allowed);
        assert!(result.violations.is_empty());
    }

    #[test]
    fn test_high_risk_promotion_blocked_until_approved() {
        let model = Model::new(ModelId(1), "m", "o").with_risk_level(RiskLevel::Unacceptable);
        let after = model.clone().with_environment(Environment::Prod);
        let action = ProposedAction::Promote {
            model_id: ModelId(1),
            to: Environment::Prod,
        };

        let result = run(&action, &model, &after, &InMemoryMetrics::new());
        assert_eq!(result.violations.len(), 1);
        assert_eq!(
            result.violations[0].condition_type,
            ConditionType::BlockHighRiskWithoutApproval
        );
        assert_eq!(result.violations[0].details["to_environment"], "prod");
    }

    #[test]
    fn test_demotion_and_low_risk_promotion_allowed() {
        let high = Model::new(ModelId(1), "m", "o")
            .with_risk_level(RiskLevel::High)
            .with_environment(Environment::Staging);
        let demoted = high.clone().with_environment(Environment::Test);
        let action = ProposedAction::Promote {
            model_id: ModelId(1),
            to: Environment::Test,
        };
        assert!(run(&action, &high, &demoted, &InMemoryMetrics::new()).allowed);

        let limited = Model::new(ModelId(2), "m", "o").with_risk_level(RiskLevel::Limited);
        let promoted = limited.clone().with_environment(Environment::Prod);
        let action = ProposedAction::Promote {
            model_id: ModelId(2),
            to: Environment::Prod,
        };
        assert!(run(&action, &limited, &promoted, &InMemoryMetrics::new()).allowed);
    }

    #[test]
    fn test_into_result() {
        let clean = EvaluationResult::from_violations(vec![]);
        assert!(clean.into_result(ModelId(1)).is_ok());

        let model = Model::new(ModelId(1), "m", "o").with_risk_level(RiskLevel::High);
        let (action, after) = approve(&model);
        let result = run(&action, &model, &after, &InMemoryMetrics::new());
        assert!(matches!(
            result.into_result(ModelId(1)),
            Err(GovError::PolicyBreach { violations, .. }) if violations.len() == 2
        ));
    }
}
