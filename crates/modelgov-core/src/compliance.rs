//! Compliance state machine
//!
//! ```text
//! draft ──► under_review ──► approved ──► retired
//!   │ ▲          │               │
//!   │ └──────────┴───────────────┘   (rejection back to draft)
//!   └──────────────► approved        (direct approval; policy-gated)
//! ```
//!
//! Any non-retired state may move to `retired`, which is terminal. This
//! module only checks the shape of a transition and keeps the approval
//! metadata in step with the status; whether an approval is permitted is
//! decided by the policy engine.

use crate::errors::{GovError, Result};
use crate::model::{ApprovalMetadata, ComplianceStatus, Model};

/// Targets reachable from `from` in one step
pub fn allowed_targets(from: ComplianceStatus) -> &'static [ComplianceStatus] {
    use ComplianceStatus::*;
    match from {
        Draft => &[UnderReview, Approved, Retired],
        UnderReview => &[Approved, Draft, Retired],
        Approved => &[Draft, Retired],
        Retired => &[],
    }
}

/// Check the shape of a status change
///
/// # Errors
///
/// Returns `InvalidTransition` if `to` is not reachable from the model's
/// current status, including self-transitions and anything out of `retired`.
pub fn validate_transition(model: &Model, to: ComplianceStatus) -> Result<()> {
    let from = model.compliance_status;
    if allowed_targets(from).contains(&to) {
        Ok(())
    } else {
        Err(GovError::InvalidTransition {
            model_id: model.id,
            from,
            to,
        })
    }
}

/// Produce the model as it would be after moving to `to`
///
/// Status and approval metadata change together: entering `approved` stores
/// `approval`, leaving it clears the metadata.
///
/// # Errors
///
/// - `InvalidTransition` for an illegal move
/// - `ApprovalMetadataMissing` when entering `approved` without metadata
/// - `UnexpectedApprovalMetadata` when metadata accompanies any other target
pub fn apply_transition(
    model: &Model,
    to: ComplianceStatus,
    approval: Option<ApprovalMetadata>,
) -> Result<Model> {
    validate_transition(model, to)?;

    let approval = match (to, approval) {
        (ComplianceStatus::Approved, Some(approval)) => Some(approval),
        (ComplianceStatus::Approved, None) => {
            return Err(GovError::ApprovalMetadataMissing { model_id: model.id })
        }
        (_, Some(_)) => {
            return Err(GovError::UnexpectedApprovalMetadata {
                model_id: model.id,
                to,
            })
        }
        (_, None) => None,
    };

    let mut next = model.clone();
    next.compliance_status = to;
    next.approval = approval;
    next.check_approval_invariant()?;

    tracing::debug!(
        model_id = %model.id,
        from = %model.compliance_status,
        to = %to,
        "compliance transition applied"
    );
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use modelgov_core_types::{ModelId, UserId};
    use ComplianceStatus::*;

    fn model_in(status: ComplianceStatus) -> Model {
        let approval = (status == Approved).then(|| ApprovalMetadata::new(UserId(1), Utc::now()));
        Model::new(ModelId(1), "scorer", "team")
            .with_status(status, approval)
            .unwrap()
    }

    fn approval() -> Option<ApprovalMetadata> {
        Some(ApprovalMetadata::new(UserId(42), Utc::now()).with_notes("signed off"))
    }

    #[test]
    fn test_transition_table() {
        let all = [Draft, UnderReview, Approved, Retired];
        let legal = [
            (Draft, UnderReview),
            (Draft, Approved),
            (Draft, Retired),
            (UnderReview, Approved),
            (UnderReview, Draft),
            (UnderReview, Retired),
            (Approved, Draft),
            (Approved, Retired),
        ];
        for from in all {
            for to in all {
                let result = validate_transition(&model_in(from), to);
                assert_eq!(
                    result.is_ok(),
                    legal.contains(&(from, to)),
                    "{} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_retired_is_terminal() {
        let err = validate_transition(&model_in(Retired), Draft).unwrap_err();
        assert_eq!(
            err,
            GovError::InvalidTransition {
                model_id: ModelId(1),
                from: Retired,
                to: Draft
            }
        );
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_entering_approved_stores_metadata() {
        let next = apply_transition(&model_in(UnderReview), Approved, approval()).unwrap();
        assert!(next.is_approved());
        assert_eq!(next.approval.as_ref().map(|a| a.approved_by), Some(UserId(42)));
        assert!(next.approval_consistent());
    }

    #[test]
    fn test_entering_approved_requires_metadata() {
        assert_eq!(
            apply_transition(&model_in(UnderReview), Approved, None).unwrap_err(),
            GovError::ApprovalMetadataMissing {
                model_id: ModelId(1)
            }
        );
    }

    #[test]
    fn test_leaving_approved_clears_metadata() {
        for to in [Draft, Retired] {
            let next = apply_transition(&model_in(Approved), to, None).unwrap();
            assert_eq!(next.compliance_status, to);
            assert!(next.approval.is_none());
        }
    }

    #[test]
    fn test_metadata_rejected_for_other_targets() {
        assert!(matches!(
            apply_transition(&model_in(Draft), UnderReview, approval()),
            Err(GovError::UnexpectedApprovalMetadata { .. })
        ));
    }

    #[test]
    fn test_apply_does_not_touch_input() {
        let model = model_in(Draft);
        let _ = apply_transition(&model, UnderReview, None).unwrap();
        assert_eq!(model.compliance_status, Draft);
    }
}
