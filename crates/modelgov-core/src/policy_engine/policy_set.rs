use std::collections::BTreeMap;

use modelgov_core_types::PolicyId;
use serde::{Deserialize, Serialize};

use crate::errors::{GovError, Result};
use crate::model::{EntityKind, Policy, PolicyScope};

/// The organization's policy set, keyed and iterated by ascending id
///
/// Passed explicitly into every evaluation; the engine holds no ambient
/// policy state. Construction validates each policy's scope binding, so a
/// `PolicySet` never contains a policy that could not be matched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Policy>", into = "Vec<Policy>")]
pub struct PolicySet {
    policies: BTreeMap<PolicyId, Policy>,
}

impl PolicySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a list of policies
    ///
    /// # Errors
    ///
    /// Returns `InvalidPolicy` for a duplicate id or a bad scope binding.
    pub fn from_policies(policies: impl IntoIterator<Item = Policy>) -> Result<Self> {
        let mut set = Self::new();
        for policy in policies {
            set.insert(policy)?;
        }
        Ok(set)
    }

    /// Add a policy
    ///
    /// # Errors
    ///
    /// Returns `InvalidPolicy` if the id is taken, an organization or
    /// environment policy lacks its binding, or a global policy carries one.
    pub fn insert(&mut self, policy: Policy) -> Result<()> {
        if self.policies.contains_key(&policy.id) {
            return Err(invalid(&policy, "duplicate policy id"));
        }
        check_binding(&policy)?;
        self.policies.insert(policy.id, policy);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `UnknownEntity` if no policy has this id.
    pub fn get(&self, id: PolicyId) -> Result<&Policy> {
        self.policies
            .get(&id)
            .ok_or_else(|| GovError::unknown(EntityKind::Policy, id))
    }

    /// Active policies in ascending id order
    pub fn active(&self) -> impl Iterator<Item = &Policy> {
        self.policies.values().filter(|p| p.is_active)
    }

    /// Soft-retire a policy
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` if no policy has this id.
    pub fn deactivate(&mut self, id: PolicyId) -> Result<()> {
        self.policies
            .get_mut(&id)
            .ok_or_else(|| GovError::unknown(EntityKind::Policy, id))?
            .deactivate();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

fn check_binding(policy: &Policy) -> Result<()> {
    match policy.scope {
        PolicyScope::Global if policy.organization_id.is_some() || policy.environment.is_some() => {
            Err(invalid(policy, "global policy must not carry a scope binding"))
        }
        PolicyScope::Organization if policy.organization_id.is_none() => Err(invalid(
            policy,
            "organization policy requires organization_id",
        )),
        PolicyScope::Environment if policy.environment.is_none() => {
            Err(invalid(policy, "environment policy requires environment"))
        }
        _ => Ok(()),
    }
}

fn invalid(policy: &Policy, reason: &str) -> GovError {
    GovError::InvalidPolicy {
        policy_id: policy.id,
        reason: reason.to_string(),
    }
}

impl TryFrom<Vec<Policy>> for PolicySet {
    type Error = GovError;

    fn try_from(policies: Vec<Policy>) -> Result<Self> {
        Self::from_policies(policies)
    }
}

impl From<PolicySet> for Vec<Policy> {
    fn from(set: PolicySet) -> Self {
        set.policies.into_values().collect()
    }
}
