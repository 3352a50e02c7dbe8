/// Scenario 1: Direct approval of a high-risk draft
///
/// A high-risk model in draft with no evaluation metrics cannot jump
/// straight to approved.
mod common;

use common::*;
use modelgov_core::model::{ComplianceStatus, ConditionType, RiskLevel};
use modelgov_core::{AuditLog, GovError, GovernanceEngine, InMemoryMetrics};
use modelgov_core_types::ModelId;

#[test]
fn test_scenario_01_direct_approval_breaches_review_policy() {
    // GIVEN a high-risk draft model with zero evaluation metrics
    let graph = graph_of([governed_model(1, RiskLevel::High, ComplianceStatus::Draft)]);
    let policies = standard_policies();
    let metrics = InMemoryMetrics::new();
    let engine = GovernanceEngine::new(&policies, &metrics);
    let mut audit = AuditLog::new();

    // WHEN proposing draft -> approved
    let result = engine.propose(
        &graph,
        &transition(1, ComplianceStatus::Approved),
        &reviewer_ctx(),
        &mut audit,
    );

    // THEN the proposal fails with a breach citing require_review_for_high_risk
    let (model_id, violations) = match result {
        Err(GovError::PolicyBreach {
            model_id,
            violations,
        }) => (model_id, violations),
        other => panic!("expected PolicyBreach, got {:?}", other),
    };
    assert_eq!(model_id, ModelId(1));
    assert_eq!(violations[0].policy_id, REVIEW_POLICY);
    assert_eq!(
        violations[0].condition_type,
        ConditionType::RequireReviewForHighRisk
    );

    // AND the missing evaluation is reported after it, in policy id order
    let conditions: Vec<ConditionType> = violations.iter().map(|v| v.condition_type).collect();
    assert_eq!(
        conditions,
        vec![
            ConditionType::RequireReviewForHighRisk,
            ConditionType::RequireEvaluationBeforeApproval,
        ]
    );

    // AND the model is untouched
    let model = graph.get_model(ModelId(1)).unwrap();
    assert_eq!(model.compliance_status, ComplianceStatus::Draft);
    assert!(model.approval.is_none());
}

#[test]
fn test_scenario_01_breach_is_audited_once_with_violations() {
    let graph = graph_of([governed_model(1, RiskLevel::Unacceptable, ComplianceStatus::Draft)]);
    let policies = standard_policies();
    let metrics = InMemoryMetrics::new();
    let engine = GovernanceEngine::new(&policies, &metrics);
    let mut audit = AuditLog::new();

    let _ = engine.propose(
        &graph,
        &transition(1, ComplianceStatus::Approved),
        &reviewer_ctx(),
        &mut audit,
    );

    assert_eq!(audit.len(), 1);
    let entries = audit.entries_for("model", "1");
    let entry = entries[0];
    assert_eq!(entry.action, "compliance_transition");
    assert_eq!(entry.details["outcome"], "policy_breach");
    assert_eq!(entry.details["violated_policies"], serde_json::json!([1, 2]));
    assert_eq!(entry.timestamp, decision_time());
    assert_eq!(entry.violations.len(), 2);
    assert_eq!(entry.violations[0].policy_id, REVIEW_POLICY);

    // violations are recorded for rejected actions too
    let recorded = audit.violations_for_model(ModelId(1));
    assert_eq!(recorded.len(), 2);
    assert_eq!(recorded[0].user_id, Some(modelgov_core_types::UserId(100)));
    assert_eq!(audit.violations_for_policy(REVIEW_POLICY).len(), 1);
}

#[test]
fn test_scenario_01_limited_risk_is_not_held_for_review() {
    let graph = graph_of([governed_model(1, RiskLevel::Limited, ComplianceStatus::Draft)]);
    let policies = standard_policies();
    let metrics = InMemoryMetrics::new();
    let engine = GovernanceEngine::new(&policies, &metrics);
    let mut audit = AuditLog::new();

    let result = engine
        .evaluate(
            &graph,
            &transition(1, ComplianceStatus::Approved),
            &reviewer_ctx(),
            &mut audit,
        )
        .unwrap();

    // only the evaluation requirement applies
    assert!(!result.allowed);
    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].policy_id, EVALUATION_POLICY);
}
