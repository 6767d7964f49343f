//! Catalog repository traits
//!
//! These are the read-only collaborators the scan validation chain and
//! workflow expander depend on.

use async_trait::async_trait;

use crate::domain::ids::{PlanId, ProjectId, TargetId};

use super::entities::{Plan, Plugin, Project, Target};
use super::errors::CatalogError;

/// Project lookup
#[async_trait]
pub trait IProjectRepository: Send + Sync {
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, CatalogError>;
}

/// Target lookup
#[async_trait]
pub trait ITargetRepository: Send + Sync {
    async fn find_by_id(&self, id: &TargetId) -> Result<Option<Target>, CatalogError>;
}

/// Plan lookup
#[async_trait]
pub trait IPlanRepository: Send + Sync {
    async fn find_by_id(&self, id: &PlanId) -> Result<Option<Plan>, CatalogError>;
}

/// Plugin registry
#[async_trait]
pub trait IPluginRepository: Send + Sync {
    /// Find a plugin by its exact name and version
    async fn find_by_name_version(
        &self,
        name: &str,
        version: &str,
    ) -> Result<Option<Plugin>, CatalogError>;
}
