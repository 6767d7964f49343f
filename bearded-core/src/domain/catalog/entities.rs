//! Catalog entities: the projects, targets, plans and plugins a scan is built from

use serde::{Deserialize, Serialize};

use crate::domain::ids::{PlanId, PluginId, ProjectId, TargetId, UserId};

use super::value_objects::{PluginRef, PluginRefError, TargetType};

/// Ownership boundary for targets and scans
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub owner: UserId,
    #[serde(default)]
    pub name: String,
}

impl Project {
    pub fn new(owner: UserId, name: impl Into<String>) -> Self {
        Self {
            id: ProjectId::generate(),
            owner,
            name: name.into(),
        }
    }
}

/// Scan subject. Belongs to exactly one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub project: ProjectId,
    #[serde(rename = "type")]
    pub target_type: TargetType,
    pub address: String,
}

impl Target {
    pub fn new(project: ProjectId, target_type: TargetType, address: impl Into<String>) -> Self {
        Self {
            id: TargetId::generate(),
            project,
            target_type,
            address: address.into(),
        }
    }

    /// Address captured into a scan's configuration snapshot
    pub fn addr(&self) -> &str {
        &self.address
    }

    pub fn belongs_to(&self, project: &ProjectId) -> bool {
        &self.project == project
    }
}

/// One entry in a plan's workflow
///
/// `plugin` keeps the persisted `name:version` form; [`WorkflowStep::plugin_ref`]
/// is the single place it gets parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
    #[serde(default)]
    pub name: String,
    pub plugin: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub desc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conf: Option<serde_json::Value>,
}

impl WorkflowStep {
    pub fn new(name: impl Into<String>, plugin: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            plugin: plugin.into(),
            desc: String::new(),
            conf: None,
        }
    }

    pub fn plugin_ref(&self) -> Result<PluginRef, PluginRefError> {
        PluginRef::parse(&self.plugin)
    }
}

/// Reusable workflow template; step order is execution order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub desc: String,
    #[serde(rename = "targetType")]
    pub target_type: TargetType,
    pub workflow: Vec<WorkflowStep>,
}

impl Plan {
    pub fn new(name: impl Into<String>, target_type: TargetType, workflow: Vec<WorkflowStep>) -> Self {
        Self {
            id: PlanId::generate(),
            name: name.into(),
            desc: String::new(),
            target_type,
            workflow,
        }
    }

    pub fn is_compatible_with(&self, target: &Target) -> bool {
        self.target_type == target.target_type
    }
}

/// Registered, versioned scanning capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plugin {
    pub id: PluginId,
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub desc: String,
}

impl Plugin {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: PluginId::generate(),
            name: name.into(),
            version: version.into(),
            desc: String::new(),
        }
    }

    pub fn reference(&self) -> PluginRef {
        PluginRef::new(self.name.clone(), self.version.clone())
    }
}
