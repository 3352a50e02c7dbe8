use crate::model::{Model, Policy, PolicyScope};

/// Whether `policy` applies to `model`
///
/// Global policies match every model. Organization and environment policies
/// match only when the model carries the same binding; an unbound policy
/// matches nothing.
pub fn applies_to(policy: &Policy, model: &Model) -> bool {
    match policy.scope {
        PolicyScope::Global => true,
        PolicyScope::Organization => {
            policy.organization_id.is_some() && policy.organization_id == model.organization_id
        }
        PolicyScope::Environment => policy.environment == Some(model.environment),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConditionType, Environment};
    use modelgov_core_types::{ModelId, OrganizationId, PolicyId};

    const CONDITION: ConditionType = ConditionType::RequireReviewForHighRisk;

    #[test]
    fn test_global_matches_all() {
        let policy = Policy::global(PolicyId(1), "g", CONDITION);
        assert!(applies_to(&policy, &Model::new(ModelId(1), "m", "o")));
    }

    #[test]
    fn test_organization_scope() {
        let policy = Policy::for_organization(PolicyId(1), "org", CONDITION, OrganizationId(7));
        let ours = Model::new(ModelId(1), "m", "o").with_organization(OrganizationId(7));
        let theirs = Model::new(ModelId(2), "m", "o").with_organization(OrganizationId(8));
        let unowned = Model::new(ModelId(3), "m", "o");

        assert!(applies_to(&policy, &ours));
        assert!(!applies_to(&policy, &theirs));
        assert!(!applies_to(&policy, &unowned));
    }

    #[test]
    fn test_environment_scope() {
        let policy = Policy::for_environment(PolicyId(1), "prod", CONDITION, Environment::Prod);
        let prod = Model::new(ModelId(1), "m", "o").with_environment(Environment::Prod);
        let dev = Model::new(ModelId(2), "m", "o");

        assert!(applies_to(&policy, &prod));
        assert!(!applies_to(&policy, &dev));
    }

    #[test]
    fn test_unbound_organization_policy_matches_nothing() {
        let mut policy = Policy::for_organization(PolicyId(1), "org", CONDITION, OrganizationId(7));
        policy.organization_id = None;
        assert!(!applies_to(&policy, &Model::new(ModelId(1), "m", "o")));
    }
}
