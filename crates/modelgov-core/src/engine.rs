//! Governance engine
//!
//! Runs one proposed action through the full decision flow:
//!
//! 1. compliance state machine checks the transition shape
//! 2. dependency integrity checker validates any new edge
//! 3. policy engine evaluates the active policies against the resulting graph
//! 4. audit log records the decision
//!
//! The engine holds only borrowed configuration and never mutates the
//! caller's graph. The decision, its violations and its single audit entry
//! are produced together; when a call fails hard (unknown entity, cycle,
//! malformed input) nothing is appended.
//!
//! ## Logging Ownership
//!
//! `evaluate` and `propose` own lifecycle logging (`log_op_start!`,
//! `log_op_end!`, `log_op_error!`). Everything below uses `tracing::debug!`.

use std::time::Instant;

use modelgov_core_types::ModelId;
use serde::Serialize;
use serde_json::{json, Value};

use crate::actions::{ProposalContext, ProposedAction};
use crate::audit::AuditLog;
use crate::compliance;
use crate::config::GovernanceConfig;
use crate::errors::{GovError, Result};
use crate::graph::{EdgeProposal, EntityGraph};
use crate::metrics::MetricsSource;
use crate::model::{DatasetLink, EntityKind, Model, ModelDependency};
use crate::policy_engine::{evaluate_policies, EvaluationResult, PolicyContext, PolicySet};
use crate::{log_op_end, log_op_error, log_op_start};

/// Recoverable outcome of a decision, as written to the audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOutcome {
    Accepted,
    PolicyBreach,
    InvalidTransition,
}

impl DecisionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionOutcome::Accepted => "accepted",
            DecisionOutcome::PolicyBreach => "policy_breach",
            DecisionOutcome::InvalidTransition => "invalid_transition",
        }
    }
}

/// An accepted proposal
#[derive(Debug, Clone)]
pub struct ProposalOutcome {
    /// The graph with the action applied; the caller persists it or drops it
    pub graph: EntityGraph,
    pub evaluation: EvaluationResult,
    /// Sequence number of the audit entry recording the decision
    pub audit_sequence: u64,
}

/// Target model and graph as they would be after the action
struct Staged {
    before: Model,
    after: Model,
    next: EntityGraph,
}

/// Decision engine over an explicitly passed policy set and metrics source
pub struct GovernanceEngine<'a> {
    policies: &'a PolicySet,
    metrics: &'a dyn MetricsSource,
}

impl<'a> GovernanceEngine<'a> {
    pub fn new(policies: &'a PolicySet, metrics: &'a dyn MetricsSource) -> Self {
        Self { policies, metrics }
    }

    pub fn from_config(config: &'a GovernanceConfig, metrics: &'a dyn MetricsSource) -> Self {
        Self::new(&config.policies, metrics)
    }

    /// Decide whether an action would be allowed, without producing the new graph
    ///
    /// A denial is a normal result (`allowed == false`), not an error. The
    /// decision is audited either way.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` for an illegal status move (audited)
    /// - `UnknownEntity`, `EntityRetired`, `VersionNotOwned`, `DuplicateEdge`,
    ///   `CycleDetected` or approval metadata errors (not audited)
    pub fn evaluate(
        &self,
        graph: &EntityGraph,
        action: &ProposedAction,
        ctx: &ProposalContext,
        audit: &mut AuditLog,
    ) -> Result<EvaluationResult> {
        let model_id = action.target_model();
        log_op_start!(
            "evaluate",
            model_id = model_id.get(),
            request_id = ctx.request.request_id.as_str()
        );
        let start = Instant::now();

        let (_, evaluation, _) = self
            .decide(graph, action, ctx, audit, true)
            .map_err(|e| {
                log_op_error!(
                    "evaluate",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    model_id = model_id.get()
                );
                e
            })?;

        log_op_end!(
            "evaluate",
            duration_ms = start.elapsed().as_millis() as u64,
            model_id = model_id.get(),
            allowed = evaluation.allowed,
            violation_count = evaluation.violations.len() as u64
        );
        Ok(evaluation)
    }

    /// Run an action through the full decision flow
    ///
    /// On acceptance returns the post-mutation graph for the caller to commit.
    ///
    /// # Errors
    ///
    /// - `PolicyBreach` carrying the violations (audited)
    /// - `InvalidTransition` for an illegal status move (audited)
    /// - `UnknownEntity`, `EntityRetired`, `VersionNotOwned`, `DuplicateEdge`,
    ///   `CycleDetected` or approval metadata errors (not audited)
    pub fn propose(
        &self,
        graph: &EntityGraph,
        action: &ProposedAction,
        ctx: &ProposalContext,
        audit: &mut AuditLog,
    ) -> Result<ProposalOutcome> {
        let model_id = action.target_model();
        log_op_start!(
            "propose",
            model_id = model_id.get(),
            action = action.name(),
            request_id = ctx.request.request_id.as_str()
        );
        let start = Instant::now();

        let outcome = self
            .decide(graph, action, ctx, audit, false)
            .and_then(|(next, evaluation, audit_sequence)| {
                if evaluation.allowed {
                    Ok(ProposalOutcome {
                        graph: next,
                        evaluation,
                        audit_sequence,
                    })
                } else {
                    Err(GovError::PolicyBreach {
                        model_id,
                        violations: evaluation.violations,
                    })
                }
            })
            .map_err(|e| {
                log_op_error!(
                    "propose",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    model_id = model_id.get()
                );
                e
            })?;

        log_op_end!(
            "propose",
            duration_ms = start.elapsed().as_millis() as u64,
            model_id = model_id.get(),
            outcome = DecisionOutcome::Accepted.as_str(),
            audit_sequence = outcome.audit_sequence
        );
        Ok(outcome)
    }

    fn decide(
        &self,
        graph: &EntityGraph,
        action: &ProposedAction,
        ctx: &ProposalContext,
        audit: &mut AuditLog,
        dry_run: bool,
    ) -> Result<(EntityGraph, EvaluationResult, u64)> {
        let model_id = action.target_model();
        let entity_id = model_id.to_string();

        let staged = match stage(graph, action, ctx) {
            Ok(staged) => staged,
            Err(err @ GovError::InvalidTransition { .. }) => {
                let details = audit_details(
                    action,
                    ctx,
                    dry_run,
                    DecisionOutcome::InvalidTransition,
                    json!({ "error": err.to_string() }),
                )?;
                audit.record(
                    EntityKind::Model.as_str(),
                    &entity_id,
                    action.name(),
                    details,
                    ctx.at,
                )?;
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        let evaluation = evaluate_policies(
            &PolicyContext {
                action,
                before: &staged.before,
                after: &staged.after,
                graph: &staged.next,
                metrics: self.metrics,
                proposal: ctx,
            },
            self.policies,
        );

        let outcome = if evaluation.allowed {
            DecisionOutcome::Accepted
        } else {
            DecisionOutcome::PolicyBreach
        };
        let violated: Vec<u64> = evaluation
            .violations
            .iter()
            .map(|v| v.policy_id.get())
            .collect();
        let details = audit_details(
            action,
            ctx,
            dry_run,
            outcome,
            json!({ "violated_policies": violated }),
        )?;
        let sequence = audit.record_with_violations(
            EntityKind::Model.as_str(),
            &entity_id,
            action.name(),
            details,
            ctx.at,
            evaluation.violations.clone(),
        )?;

        tracing::debug!(
            model_id = model_id.get(),
            outcome = outcome.as_str(),
            dry_run,
            "decision recorded"
        );
        Ok((staged.next, evaluation, sequence))
    }
}

/// Build the hypothetical state the policies are evaluated against
fn stage(graph: &EntityGraph, action: &ProposedAction, ctx: &ProposalContext) -> Result<Staged> {
    match action {
        ProposedAction::Transition {
            model_id,
            version_id,
            to,
            approval,
        } => {
            let before = graph.get_model(*model_id)?.clone();
            if let Some(version_id) = version_id {
                graph.get_owned_version(*model_id, *version_id)?;
            }
            let after = compliance::apply_transition(&before, *to, approval.clone())?;
            let next = graph.propose_model_update(after.clone())?;
            Ok(Staged {
                before,
                after,
                next,
            })
        }
        ProposedAction::Promote { model_id, to } => {
            let before = graph.get_live_model(*model_id)?.clone();
            let after = before.clone().with_environment(*to);
            let next = graph.propose_model_update(after.clone())?;
            Ok(Staged {
                before,
                after,
                next,
            })
        }
        ProposedAction::LinkDataset {
            model,
            dataset_id,
            dataset_type,
        } => {
            let mut link = DatasetLink::new(model.model_id, *dataset_id, *dataset_type);
            link.version_id = model.version_id;
            link.created_at = ctx.at;
            let next = graph.propose_edge(EdgeProposal::DatasetLink(link))?;
            unchanged(graph, model.model_id, next)
        }
        ProposedAction::AddDependency {
            parent,
            child,
            dependency_type,
        } => {
            let mut dependency = ModelDependency::new(*parent, *child, *dependency_type);
            dependency.created_at = ctx.at;
            let next = graph.propose_edge(EdgeProposal::Dependency(dependency))?;
            unchanged(graph, child.model_id, next)
        }
    }
}

/// Edge actions leave the target model itself as it was
fn unchanged(graph: &EntityGraph, model_id: ModelId, next: EntityGraph) -> Result<Staged> {
    let model = graph.get_model(model_id)?.clone();
    Ok(Staged {
        before: model.clone(),
        after: model,
        next,
    })
}

fn audit_details(
    action: &ProposedAction,
    ctx: &ProposalContext,
    dry_run: bool,
    outcome: DecisionOutcome,
    extra: Value,
) -> Result<Value> {
    let mut details = json!({
        "outcome": outcome,
        "dry_run": dry_run,
        "proposed": serde_json::to_value(action)?,
        "actor_id": ctx.actor,
        "request_id": ctx.request.request_id.as_str(),
        "trace_id": ctx.request.trace_id.as_ref().map(|t| t.as_str()),
    });
    if let (Some(details), Value::Object(extra)) = (details.as_object_mut(), extra) {
        details.extend(extra);
    }
    Ok(details)
}
