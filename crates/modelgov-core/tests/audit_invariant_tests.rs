/// Audit log completeness and integrity across a sequence of decisions
mod common;

use common::*;
use modelgov_core::model::{ComplianceStatus, Environment, RiskLevel};
use modelgov_core::{AuditLog, GovernanceEngine, InMemoryMetrics, ProposedAction};
use modelgov_core_types::ModelId;

#[test]
fn test_every_recoverable_decision_appends_one_entry() {
    // GIVEN three models in different states
    let graph = graph_of([
        governed_model(1, RiskLevel::High, ComplianceStatus::Draft),
        governed_model(2, RiskLevel::Limited, ComplianceStatus::Draft),
        governed_model(3, RiskLevel::Minimal, ComplianceStatus::Retired),
    ]);
    let policies = standard_policies();
    let metrics = InMemoryMetrics::new();
    let engine = GovernanceEngine::new(&policies, &metrics);
    let mut audit = AuditLog::new();
    let ctx = reviewer_ctx();

    // WHEN running a mix of breaches, acceptances, rejections and dry runs
    let proposals = [
        transition(1, ComplianceStatus::Approved), // policy breach
        transition(2, ComplianceStatus::UnderReview), // accepted
        transition(3, ComplianceStatus::Draft),    // invalid transition
        ProposedAction::Promote {
            model_id: ModelId(2),
            to: Environment::Test,
        }, // accepted
    ];
    for action in &proposals {
        let _ = engine.propose(&graph, action, &ctx, &mut audit);
    }
    let _ = engine.evaluate(
        &graph,
        &transition(1, ComplianceStatus::UnderReview),
        &ctx,
        &mut audit,
    );

    // THEN there is exactly one entry per decision, chained in order
    assert_eq!(audit.len(), proposals.len() + 1);
    assert!(audit.verify_chain());
    let outcomes: Vec<&str> = audit
        .entries()
        .iter()
        .map(|e| e.details["outcome"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(
        outcomes,
        vec![
            "policy_breach",
            "accepted",
            "invalid_transition",
            "accepted",
            "accepted"
        ]
    );

    // AND per-entity retrieval keeps creation order
    let model_one: Vec<u64> = audit
        .entries_for("model", "1")
        .iter()
        .map(|e| e.sequence)
        .collect();
    assert_eq!(model_one, vec![0, 4]);
    assert_eq!(audit.entries()[4].details["dry_run"], true);
}

#[test]
fn test_hard_failures_leave_log_untouched() {
    let graph = graph_of([governed_model(1, RiskLevel::Limited, ComplianceStatus::Draft)]);
    let policies = standard_policies();
    let metrics = InMemoryMetrics::new();
    let engine = GovernanceEngine::new(&policies, &metrics);
    let mut audit = AuditLog::new();

    // unknown model
    assert!(engine
        .propose(
            &graph,
            &transition(42, ComplianceStatus::UnderReview),
            &reviewer_ctx(),
            &mut audit
        )
        .is_err());
    // approval metadata on a non-approval transition
    let action = ProposedAction::Transition {
        model_id: ModelId(1),
        version_id: None,
        to: ComplianceStatus::UnderReview,
        approval: Some(approval()),
    };
    assert!(engine
        .propose(&graph, &action, &reviewer_ctx(), &mut audit)
        .is_err());

    assert!(audit.is_empty());
    assert!(audit.violations().is_empty());
}

#[test]
fn test_entry_records_actor_and_request() {
    let graph = graph_of([governed_model(1, RiskLevel::Limited, ComplianceStatus::Draft)]);
    let policies = standard_policies();
    let metrics = InMemoryMetrics::new();
    let engine = GovernanceEngine::new(&policies, &metrics);
    let mut audit = AuditLog::new();
    let ctx = reviewer_ctx();

    engine
        .propose(
            &graph,
            &transition(1, ComplianceStatus::UnderReview),
            &ctx,
            &mut audit,
        )
        .unwrap();

    let details = &audit.entries()[0].details;
    assert_eq!(details["actor_id"], 100);
    assert_eq!(details["request_id"], ctx.request.request_id.as_str());
    assert_eq!(details["proposed"]["to"], "under_review");
    assert_eq!(details["violated_policies"], serde_json::json!([]));
}
