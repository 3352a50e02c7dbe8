//! Governance configuration
//!
//! The policy set and logging profile are passed to the engine explicitly.
//! They are usually loaded from TOML:
//!
//! ```toml
//! [logging]
//! profile = "production"
//!
//! [[policies]]
//! id = 1
//! name = "Review high-risk models"
//! scope = "global"
//! condition_type = "require_review_for_high_risk"
//!
//! [[policies]]
//! id = 2
//! name = "Production exposure gate"
//! scope = "environment"
//! environment = "prod"
//! condition_type = "block_high_risk_without_approval"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{GovError, Result};
use crate::logging_facility::Profile;
use crate::model::Policy;
use crate::policy_engine::PolicySet;

/// Logging section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub profile: Profile,
}

/// Validated configuration for a governance engine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GovernanceConfig {
    pub policies: PolicySet,
    pub logging: LoggingConfig,
}

/// Wire shape before policy validation
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    policies: Vec<Policy>,
    #[serde(default)]
    logging: LoggingConfig,
}

impl GovernanceConfig {
    /// Parse and validate a TOML document
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if the document is not valid TOML or has the wrong shape
    /// - `InvalidPolicy` for a duplicate policy id or a bad scope binding
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(source).map_err(|e| GovError::InvalidConfig {
            reason: e.to_string(),
        })?;
        let policies = PolicySet::from_policies(raw.policies)?;

        tracing::debug!(
            policies = policies.len(),
            active = policies.active().count(),
            "governance config loaded"
        );
        Ok(Self {
            policies,
            logging: raw.logging,
        })
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the file cannot be read, plus everything
    /// [`GovernanceConfig::from_toml_str`] returns.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| GovError::InvalidConfig {
            reason: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&source)
    }
}
