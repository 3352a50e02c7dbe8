//! Logging initialization

use std::sync::Once;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile, selectable from configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Human-readable output, `modelgov=debug`
    #[default]
    Development,
    /// JSON output, `modelgov=info`
    Production,
    /// Events go to the capture layer from `init_test_capture()`
    Test,
}

impl Profile {
    /// Filter used when `RUST_LOG` is not set
    pub fn default_filter(&self) -> &'static str {
        match self {
            Profile::Development | Profile::Test => "modelgov=debug",
            Profile::Production => "modelgov=info",
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Only the first call has an effect. If the host application already
/// installed a global subscriber, that subscriber is kept.
///
/// # Example
///
/// ```
/// use modelgov_core::logging_facility::{init, Profile};
///
/// init(Profile::Production);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let filter = || {
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(profile.default_filter()))
        };
        let installed = match profile {
            Profile::Development => tracing_subscriber::fmt()
                .with_env_filter(filter())
                .finish()
                .try_init(),
            Profile::Production => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter())
                .finish()
                .try_init(),
            // capture is installed by init_test_capture()
            Profile::Test => Ok(()),
        };
        if installed.is_err() {
            tracing::debug!("global subscriber already set, keeping it");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_idempotent() {
        init(Profile::Test);
        init(Profile::Test);
        init(Profile::Development);
    }

    #[test]
    fn test_profile_from_config_names() {
        let profile: Profile = serde_json::from_str("\"production\"").unwrap();
        assert_eq!(profile, Profile::Production);
        assert_eq!(Profile::default(), Profile::Development);
        assert_eq!(Profile::Production.default_filter(), "modelgov=info");
    }
}
