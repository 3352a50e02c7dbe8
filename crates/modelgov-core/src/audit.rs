//! Audit log
//!
//! Append-only record of every governance decision, retrievable by entity in
//! creation order. Entries are hash-chained: each stores the SHA-256 of the
//! previous entry's hash and its own content, so any later edit to a stored
//! entry is detectable with [`AuditLog::verify_chain`].
//!
//! Policy violations are stored on the entry that reported them and are
//! covered by its hash. The register views (`violations_for_model`,
//! `violations_for_policy`) read them back across the whole log.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use modelgov_core_types::{ModelId, PolicyId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::{GovError, Result};
use crate::model::PolicyViolation;

/// One immutable audit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceLogEntry {
    /// Position in the log, starting at 0
    pub sequence: u64,
    pub entity_type: String,
    pub entity_id: String,
    pub action: String,
    pub details: serde_json::Value,
    pub timestamp: DateTime<Utc>,
    /// Violations reported with this decision, in policy id order
    #[serde(default)]
    pub violations: Vec<PolicyViolation>,
    /// Hex hash of the previous entry; `None` for the first entry
    pub previous_hash: Option<String>,
    /// Hex SHA-256 over `previous_hash` and this entry's content
    pub hash: String,
}

/// Append-only, hash-chained audit log
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    entries: Vec<ComplianceLogEntry>,
    by_entity: HashMap<(String, String), Vec<usize>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    ///
    /// Returns the new entry's sequence number.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAuditEntry` if `entity_type`, `entity_id` or `action`
    /// is empty or blank. Nothing is appended in that case.
    pub fn record(
        &mut self,
        entity_type: &str,
        entity_id: &str,
        action: &str,
        details: serde_json::Value,
        timestamp: DateTime<Utc>,
    ) -> Result<u64> {
        self.record_with_violations(entity_type, entity_id, action, details, timestamp, Vec::new())
    }

    /// Append an entry together with the violations it reports
    ///
    /// The entry and its violations become visible together.
    ///
    /// # Errors
    ///
    /// Same as [`AuditLog::record`].
    pub fn record_with_violations(
        &mut self,
        entity_type: &str,
        entity_id: &str,
        action: &str,
        details: serde_json::Value,
        timestamp: DateTime<Utc>,
        violations: Vec<PolicyViolation>,
    ) -> Result<u64> {
        require("entity_type", entity_type)?;
        require("entity_id", entity_id)?;
        require("action", action)?;

        let sequence = self.entries.len() as u64;
        let previous_hash = self.entries.last().map(|e| e.hash.clone());
        let mut entry = ComplianceLogEntry {
            sequence,
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            action: action.to_string(),
            details,
            timestamp,
            violations,
            previous_hash,
            hash: String::new(),
        };
        entry.hash = compute_hash(&entry);

        tracing::debug!(
            sequence,
            entity_type,
            entity_id,
            action,
            violation_count = entry.violations.len(),
            "audit entry appended"
        );

        self.by_entity
            .entry((entry.entity_type.clone(), entry.entity_id.clone()))
            .or_default()
            .push(self.entries.len());
        self.entries.push(entry);
        Ok(sequence)
    }

    /// Entries for one entity in creation order
    pub fn entries_for(&self, entity_type: &str, entity_id: &str) -> Vec<&ComplianceLogEntry> {
        self.by_entity
            .get(&(entity_type.to_string(), entity_id.to_string()))
            .map(|positions| positions.iter().map(|&i| &self.entries[i]).collect())
            .unwrap_or_default()
    }

    pub fn entries(&self) -> &[ComplianceLogEntry] {
        &self.entries
    }

    pub fn get(&self, sequence: u64) -> Option<&ComplianceLogEntry> {
        usize::try_from(sequence)
            .ok()
            .and_then(|i| self.entries.get(i))
    }

    /// Every recorded violation in log order
    pub fn violations(&self) -> Vec<&PolicyViolation> {
        self.violations_where(|_| true)
    }

    pub fn violations_for_model(&self, model_id: ModelId) -> Vec<&PolicyViolation> {
        self.violations_where(|v| v.model_id == model_id)
    }

    pub fn violations_for_policy(&self, policy_id: PolicyId) -> Vec<&PolicyViolation> {
        self.violations_where(|v| v.policy_id == policy_id)
    }

    fn violations_where(&self, keep: impl Fn(&PolicyViolation) -> bool) -> Vec<&PolicyViolation> {
        self.entries
            .iter()
            .flat_map(|e| e.violations.iter())
            .filter(|v| keep(v))
            .collect()
    }

    /// Recompute every hash and check each link to its predecessor
    pub fn verify_chain(&self) -> bool {
        let mut previous: Option<&str> = None;
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.sequence != i as u64
                || entry.previous_hash.as_deref() != previous
                || compute_hash(entry) != entry.hash
            {
                tracing::debug!(sequence = i, "audit chain broken");
                return false;
            }
            previous = Some(&entry.hash);
        }
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GovError::InvalidAuditEntry {
            reason: format!("{} is required", field),
        });
    }
    Ok(())
}

fn compute_hash(entry: &ComplianceLogEntry) -> String {
    let mut hasher = Sha256::new();
    if let Some(previous) = &entry.previous_hash {
        hasher.update(previous.as_bytes());
    }
    hasher.update(entry.sequence.to_le_bytes());
    // fields are NUL-terminated
    for field in [&entry.entity_type, &entry.entity_id, &entry.action] {
        hasher.update(field.as_bytes());
        hasher.update([0u8]);
    }
    hasher.update(entry.details.to_string().as_bytes());
    hasher.update([0u8]);
    hasher.update(entry.timestamp.to_rfc3339().as_bytes());
    for violation in &entry.violations {
        hash_violation(&mut hasher, violation);
    }
    hex::encode(hasher.finalize())
}

fn hash_violation(hasher: &mut Sha256, violation: &PolicyViolation) {
    hasher.update([0u8]);
    hasher.update(violation.policy_id.get().to_le_bytes());
    hasher.update(violation.model_id.get().to_le_bytes());
    for id in [
        violation.model_version_id.map(|v| v.get()),
        violation.user_id.map(|u| u.get()),
    ] {
        match id {
            Some(id) => {
                hasher.update([1u8]);
                hasher.update(id.to_le_bytes());
            }
            None => hasher.update([0u8]),
        }
    }
    for field in [violation.condition_type.as_str(), violation.action.as_str()] {
        hasher.update(field.as_bytes());
        hasher.update([0u8]);
    }
    hasher.update(violation.details.to_string().as_bytes());
    hasher.update([0u8]);
    hasher.update(violation.created_at.to_rfc3339().as_bytes());
}
