//! Lifecycle logging of engine operations
//!
//! The capture subscriber is global, so every test filters on a model id
//! no other test uses.

mod common;

use common::*;
use modelgov_core::logging_facility::init_test_capture;
use modelgov_core::model::{ComplianceStatus, RiskLevel};
use modelgov_core::{AuditLog, GovernanceEngine, InMemoryMetrics};
use modelgov_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use tracing::Level;

fn events_for(
    capture: &modelgov_core::logging_facility::TestCapture,
    op: &str,
    model_id: &str,
) -> Vec<modelgov_core::logging_facility::CapturedEvent> {
    capture
        .events_where("model_id", model_id)
        .into_iter()
        .filter(|e| e.op.as_deref() == Some(op))
        .collect()
}

#[test]
fn test_accepted_proposal_logs_start_and_end() {
    let capture = init_test_capture();
    let graph = graph_of([governed_model(9101, RiskLevel::Minimal, ComplianceStatus::Draft)]);
    let policies = standard_policies();
    let metrics = InMemoryMetrics::new();
    let engine = GovernanceEngine::new(&policies, &metrics);
    let mut audit = AuditLog::new();

    engine
        .propose(
            &graph,
            &transition(9101, ComplianceStatus::UnderReview),
            &reviewer_ctx(),
            &mut audit,
        )
        .unwrap();

    let events = events_for(&capture, "propose", "9101");
    let kinds: Vec<&str> = events.iter().filter_map(|e| e.event.as_deref()).collect();
    assert_eq!(kinds, vec![EVENT_START, EVENT_END]);
    assert_eq!(events[1].field("outcome"), Some("accepted"));
    assert!(events[1].field("duration_ms").is_some());
    assert!(events
        .iter()
        .all(|e| e.component.as_deref() == Some("modelgov_core::engine")));
    assert_eq!(
        capture.count_events(|e| e.field("model_id") == Some("9101")
            && e.event.as_deref() == Some(EVENT_START)),
        1
    );
}

#[test]
fn test_policy_breach_logs_warn_with_code() {
    let capture = init_test_capture();
    let graph = graph_of([governed_model(9102, RiskLevel::High, ComplianceStatus::Draft)]);
    let policies = standard_policies();
    let metrics = InMemoryMetrics::new();
    let engine = GovernanceEngine::new(&policies, &metrics);
    let mut audit = AuditLog::new();

    let _ = engine.propose(
        &graph,
        &transition(9102, ComplianceStatus::Approved),
        &reviewer_ctx(),
        &mut audit,
    );

    let events = events_for(&capture, "propose", "9102");
    assert_eq!(events.len(), 2);
    let end = &events[1];
    assert_eq!(end.event.as_deref(), Some(EVENT_END_ERROR));
    assert_eq!(end.level, Level::WARN);
    assert_eq!(end.field("err.code"), Some("ERR_POLICY_BREACH"));
    let message = end.field("err.message").unwrap_or_default();
    assert!(
        message.starts_with("[ERR_POLICY_BREACH] in operation 'propose'"),
        "unexpected err.message: {}",
        message
    );
}

#[test]
fn test_cycle_logs_error_level() {
    use modelgov_core::model::{DependencyType, ModelRef};
    use modelgov_core::ProposedAction;
    use modelgov_core_types::ModelId;

    let capture = init_test_capture();
    let graph = graph_of([governed_model(9103, RiskLevel::Minimal, ComplianceStatus::Draft)]);
    let policies = standard_policies();
    let metrics = InMemoryMetrics::new();
    let engine = GovernanceEngine::new(&policies, &metrics);
    let mut audit = AuditLog::new();

    let action = ProposedAction::AddDependency {
        parent: ModelRef::model(ModelId(9103)),
        child: ModelRef::model(ModelId(9103)),
        dependency_type: DependencyType::DerivedFrom,
    };
    let _ = engine.evaluate(&graph, &action, &reviewer_ctx(), &mut audit);

    let events = events_for(&capture, "evaluate", "9103");
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].level, Level::ERROR);
    assert_eq!(events[1].field("err.code"), Some("ERR_CYCLE_DETECTED"));
    assert!(events[1]
        .field("err.message")
        .is_some_and(|m| m.contains("in operation 'evaluate'")));
}
