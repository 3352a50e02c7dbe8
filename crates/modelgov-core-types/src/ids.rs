//! Opaque entity identifiers
//!
//! Every governed entity type has its own identifier space. Identifiers are
//! plain integers assigned by the persistence layer; the newtypes keep a
//! `ModelId` from being passed where a `DatasetId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Raw integer value
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier of a registered model
    ModelId
);
entity_id!(
    /// Identifier of a model version
    VersionId
);
entity_id!(
    /// Identifier of a dataset
    DatasetId
);
entity_id!(
    /// Identifier of a governance policy
    PolicyId
);
entity_id!(
    /// Identifier of an acting user (supplied by the identity collaborator)
    UserId
);
entity_id!(
    /// Identifier of an owning organization
    OrganizationId
);
entity_id!(
    /// Identifier of a recorded evaluation metric
    MetricId
);
