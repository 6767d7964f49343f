//! Entity identifiers
//!
//! Every persisted entity is keyed by a UUID wrapped in its own newtype so a
//! `TargetId` can never be passed where a `ProjectId` is expected. `parse` is
//! the id-format predicate applied to untrusted input before any lookup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Returned when a string does not satisfy the id format
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid id: {value}")]
pub struct InvalidId {
    pub value: String,
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new(id: Uuid) -> Self {
                Self(id)
            }

            /// Generate a new random id
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }

            /// Parse an id from untrusted input
            pub fn parse(value: &str) -> Result<Self, InvalidId> {
                Uuid::parse_str(value).map(Self).map_err(|_| InvalidId {
                    value: value.to_string(),
                })
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = InvalidId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
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
    /// Authenticated user id
    UserId
);
entity_id!(
    /// Project id
    ProjectId
);
entity_id!(
    /// Scan target id
    TargetId
);
entity_id!(
    /// Plan id
    PlanId
);
entity_id!(
    /// Registered plugin id
    PluginId
);
entity_id!(
    /// Scan id
    ScanId
);
entity_id!(
    /// Session id, independent of the plan step it was expanded from
    SessionId
);
