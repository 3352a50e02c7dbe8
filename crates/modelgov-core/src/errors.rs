use modelgov_core_types::{ModelId, PolicyId, VersionId};
use thiserror::Error;

use crate::model::{ComplianceStatus, EntityKind, PolicyViolation};

/// Result type alias using GovError
pub type Result<T> = std::result::Result<T, GovError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that transport layers can hand to
/// clients and tests can assert on without matching message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Recoverable: surfaced to the end user as a rejected action
    InvalidTransition,
    PolicyBreach,

    // Structural
    CycleDetected,
    UnknownEntity,
    EntityRetired,
    VersionNotOwned,
    DuplicateEdge,
    InvariantViolation,

    // Caller misuse
    InvalidInput,
    InvalidAuditEntry,
    InvalidPolicy,
    InvalidConfig,

    // Internal
    Serialization,
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidTransition => "ERR_INVALID_TRANSITION",
            ExErrorKind::PolicyBreach => "ERR_POLICY_BREACH",
            ExErrorKind::CycleDetected => "ERR_CYCLE_DETECTED",
            ExErrorKind::UnknownEntity => "ERR_UNKNOWN_ENTITY",
            ExErrorKind::EntityRetired => "ERR_ENTITY_RETIRED",
            ExErrorKind::VersionNotOwned => "ERR_VERSION_NOT_OWNED",
            ExErrorKind::DuplicateEdge => "ERR_DUPLICATE_EDGE",
            ExErrorKind::InvariantViolation => "ERR_INVARIANT_VIOLATION",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidAuditEntry => "ERR_INVALID_AUDIT_ENTRY",
            ExErrorKind::InvalidPolicy => "ERR_INVALID_POLICY",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Expected steady-state outcomes the caller reports back as a rejection
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ExErrorKind::InvalidTransition | ExErrorKind::PolicyBreach
        )
    }
}

/// Canonical structured error type
///
/// Carries the classification plus optional context for programmatic
/// handling and for log events.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    message: String,
    path: Option<Vec<ModelId>>,
    policy_ids: Option<Vec<PolicyId>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            message: String::new(),
            path: None,
            policy_ids: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add the offending dependency path (CycleDetected)
    pub fn with_path(mut self, path: Vec<ModelId>) -> Self {
        self.path = Some(path);
        self
    }

    /// Add the breached policy ids (PolicyBreach)
    pub fn with_policy_ids(mut self, ids: Vec<PolicyId>) -> Self {
        self.policy_ids = Some(ids);
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn path(&self) -> Option<&[ModelId]> {
        self.path.as_deref()
    }

    pub fn policy_ids(&self) -> Option<&[PolicyId]> {
        self.policy_ids.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for governance operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GovError {
    /// Illegal compliance-status move
    #[error("Invalid transition for model {model_id}: {from} -> {to}")]
    InvalidTransition {
        model_id: ModelId,
        from: ComplianceStatus,
        to: ComplianceStatus,
    },

    /// Dependency graph integrity breach; `path` starts and ends on the same model
    #[error("Cycle detected in dependency graph: {}", format_path(path))]
    CycleDetected { path: Vec<ModelId> },

    /// One or more active policies denied the action
    #[error("Action on model {model_id} denied by {} policy violation(s)", violations.len())]
    PolicyBreach {
        model_id: ModelId,
        violations: Vec<PolicyViolation>,
    },

    /// Malformed audit input
    #[error("Invalid audit entry: {reason}")]
    InvalidAuditEntry { reason: String },

    /// Referenced entity is absent from the supplied snapshot
    #[error("Unknown {kind}: {id}")]
    UnknownEntity { kind: EntityKind, id: u64 },

    /// Referenced entity has been soft-retired
    #[error("{kind} {id} is retired")]
    EntityRetired { kind: EntityKind, id: u64 },

    /// A pinned version belongs to a different model
    #[error("Version {version_id} does not belong to model {model_id}")]
    VersionNotOwned {
        version_id: VersionId,
        model_id: ModelId,
    },

    /// The proposed edge already exists
    #[error("Duplicate edge: {description}")]
    DuplicateEdge { description: String },

    /// Entering `approved` without approver metadata
    #[error("Approval metadata is required to approve model {model_id}")]
    ApprovalMetadataMissing { model_id: ModelId },

    /// Approval metadata supplied for a non-approval transition
    #[error("Approval metadata supplied for model {model_id} transition to {to}")]
    UnexpectedApprovalMetadata {
        model_id: ModelId,
        to: ComplianceStatus,
    },

    /// Approval metadata present without `approved` status, or the reverse
    #[error("Approval invariant broken for model {model_id}: status {status}")]
    ApprovalInvariantBroken {
        model_id: ModelId,
        status: ComplianceStatus,
    },

    /// Policy definition is unusable (missing scope binding, duplicate id)
    #[error("Invalid policy {policy_id}: {reason}")]
    InvalidPolicy { policy_id: PolicyId, reason: String },

    /// Configuration could not be parsed
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn format_path(path: &[ModelId]) -> String {
    path.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl GovError {
    /// `PolicyBreach` and `InvalidTransition` are expected outcomes; everything
    /// else is caller misuse or data corruption and must not be retried.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GovError::PolicyBreach { .. } | GovError::InvalidTransition { .. }
        )
    }

    /// Canonical kind of this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            GovError::InvalidTransition { .. } => ExErrorKind::InvalidTransition,
            GovError::CycleDetected { .. } => ExErrorKind::CycleDetected,
            GovError::PolicyBreach { .. } => ExErrorKind::PolicyBreach,
            GovError::InvalidAuditEntry { .. } => ExErrorKind::InvalidAuditEntry,
            GovError::UnknownEntity { .. } => ExErrorKind::UnknownEntity,
            GovError::EntityRetired { .. } => ExErrorKind::EntityRetired,
            GovError::VersionNotOwned { .. } => ExErrorKind::VersionNotOwned,
            GovError::DuplicateEdge { .. } => ExErrorKind::DuplicateEdge,
            GovError::ApprovalMetadataMissing { .. }
            | GovError::UnexpectedApprovalMetadata { .. } => ExErrorKind::InvalidInput,
            GovError::ApprovalInvariantBroken { .. } => ExErrorKind::InvariantViolation,
            GovError::InvalidPolicy { .. } => ExErrorKind::InvalidPolicy,
            GovError::InvalidConfig { .. } => ExErrorKind::InvalidConfig,
            GovError::Serialization { .. } => ExErrorKind::Serialization,
            GovError::Internal { .. } => ExErrorKind::Internal,
        }
    }

    pub(crate) fn unknown(kind: EntityKind, id: impl Into<u64>) -> Self {
        GovError::UnknownEntity {
            kind,
            id: id.into(),
        }
    }
}

impl From<serde_json::Error> for GovError {
    fn from(err: serde_json::Error) -> Self {
        GovError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion from GovError to the canonical ExError
impl From<GovError> for ExError {
    fn from(err: GovError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        let ex = ExError::new(kind).with_message(message);
        match err {
            GovError::InvalidTransition { model_id, .. }
            | GovError::ApprovalMetadataMissing { model_id }
            | GovError::UnexpectedApprovalMetadata { model_id, .. }
            | GovError::ApprovalInvariantBroken { model_id, .. } => {
                ex.with_entity_id(model_id.to_string())
            }
            GovError::PolicyBreach {
                model_id,
                violations,
            } => ex
                .with_entity_id(model_id.to_string())
                .with_policy_ids(violations.iter().map(|v| v.policy_id).collect()),
            GovError::CycleDetected { path } => {
                let entity = path.first().map(|id| id.to_string());
                let ex = ex.with_path(path);
                match entity {
                    Some(id) => ex.with_entity_id(id),
                    None => ex,
                }
            }
            GovError::UnknownEntity { kind, id } | GovError::EntityRetired { kind, id } => {
                ex.with_entity_id(format!("{}:{}", kind, id))
            }
            GovError::VersionNotOwned { version_id, .. } => {
                ex.with_entity_id(format!("{}:{}", EntityKind::ModelVersion, version_id))
            }
            GovError::InvalidPolicy { policy_id, .. } => {
                ex.with_entity_id(format!("{}:{}", EntityKind::Policy, policy_id))
            }
            GovError::InvalidAuditEntry { .. }
            | GovError::DuplicateEdge { .. }
            | GovError::InvalidConfig { .. }
            | GovError::Serialization { .. }
            | GovError::Internal { .. } => ex,
        }
    }
}
