//! Catalog value objects

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Kind of scan subject. A plan only runs against targets of its own type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Web,
    Host,
    Mobile,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Host => "host",
            Self::Mobile => "mobile",
        }
    }

    /// Parse the lowercase wire representation
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "web" => Some(Self::Web),
            "host" => Some(Self::Host),
            "mobile" => Some(Self::Mobile),
            _ => None,
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a `name:version` plugin reference is malformed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed plugin reference '{reference}', expected name:version")]
pub struct PluginRefError {
    pub reference: String,
}

/// Parsed `name:version` reference to a registered plugin
///
/// Resolution is always by the exact pair; there is no "latest" fallback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginRef {
    pub name: String,
    pub version: String,
}

impl PluginRef {
    pub const SEPARATOR: char = ':';

    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Split `reference` into exactly two non-empty components
    pub fn parse(reference: &str) -> Result<Self, PluginRefError> {
        let malformed = || PluginRefError {
            reference: reference.to_string(),
        };

        let mut parts = reference.split(Self::SEPARATOR);
        let name = parts.next().filter(|s| !s.is_empty()).ok_or_else(malformed)?;
        let version = parts.next().filter(|s| !s.is_empty()).ok_or_else(malformed)?;
        if parts.next().is_some() {
            return Err(malformed());
        }

        Ok(Self::new(name, version))
    }
}

impl fmt::Display for PluginRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.name, Self::SEPARATOR, self.version)
    }
}

impl std::str::FromStr for PluginRef {
    type Err = PluginRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
