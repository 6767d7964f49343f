//! SQLx implementation of the catalog repositories

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;
use std::sync::Arc;
use uuid::Uuid;

use bearded_core::domain::catalog::{
    CatalogError, IPlanRepository, IPluginRepository, IProjectRepository, ITargetRepository, Plan,
    Plugin, Project, Target, TargetType, WorkflowStep,
};
use bearded_core::domain::ids::{PlanId, ProjectId, TargetId};

#[derive(Debug, sqlx::FromRow)]
struct ProjectRow {
    id: Uuid,
    owner_id: Uuid,
    name: String,
}

#[derive(Debug, sqlx::FromRow)]
struct TargetRow {
    id: Uuid,
    project_id: Uuid,
    target_type: String,
    address: String,
}

#[derive(Debug, sqlx::FromRow)]
struct PlanRow {
    id: Uuid,
    name: String,
    description: String,
    target_type: String,
    workflow: Json<Vec<WorkflowStep>>,
}

#[derive(Debug, sqlx::FromRow)]
struct PluginRow {
    id: Uuid,
    name: String,
    version: String,
    description: String,
}

fn parse_target_type(value: &str) -> Result<TargetType, CatalogError> {
    TargetType::parse(value).ok_or_else(|| CatalogError::CorruptRecord {
        message: format!("unknown target type '{}'", value),
    })
}

fn database_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> CatalogError {
    move |e| {
        tracing::error!("Database error {}: {}", context, e);
        CatalogError::DatabaseError {
            message: e.to_string(),
        }
    }
}

/// SQLx implementation of the project, target, plan and plugin repositories
pub struct SqlxCatalogRepository {
    pool: Arc<PgPool>,
}

impl SqlxCatalogRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IProjectRepository for SqlxCatalogRepository {
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, CatalogError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            "SELECT id, owner_id, name FROM projects WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(database_error("finding project"))?;

        Ok(row.map(|row| Project {
            id: row.id.into(),
            owner: row.owner_id.into(),
            name: row.name,
        }))
    }
}

#[async_trait]
impl ITargetRepository for SqlxCatalogRepository {
    async fn find_by_id(&self, id: &TargetId) -> Result<Option<Target>, CatalogError> {
        let row = sqlx::query_as::<_, TargetRow>(
            "SELECT id, project_id, target_type, address FROM targets WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(database_error("finding target"))?;

        row.map(|row| {
            Ok(Target {
                id: row.id.into(),
                project: row.project_id.into(),
                target_type: parse_target_type(&row.target_type)?,
                address: row.address,
            })
        })
        .transpose()
    }
}

#[async_trait]
impl IPlanRepository for SqlxCatalogRepository {
    async fn find_by_id(&self, id: &PlanId) -> Result<Option<Plan>, CatalogError> {
        let row = sqlx::query_as::<_, PlanRow>(
            "SELECT id, name, description, target_type, workflow FROM plans WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(database_error("finding plan"))?;

        row.map(|row| {
            Ok(Plan {
                id: row.id.into(),
                name: row.name,
                desc: row.description,
                target_type: parse_target_type(&row.target_type)?,
                workflow: row.workflow.0,
            })
        })
        .transpose()
    }
}

#[async_trait]
impl IPluginRepository for SqlxCatalogRepository {
    async fn find_by_name_version(
        &self,
        name: &str,
        version: &str,
    ) -> Result<Option<Plugin>, CatalogError> {
        // TODO: resolve "latest" once plugin versions carry an ordering
        let row = sqlx::query_as::<_, PluginRow>(
            "SELECT id, name, version, description FROM plugins WHERE name = $1 AND version = $2",
        )
        .bind(name)
        .bind(version)
        .fetch_optional(&*self.pool)
        .await
        .map_err(database_error("finding plugin"))?;

        Ok(row.map(|row| Plugin {
            id: row.id.into(),
            name: row.name,
            version: row.version,
            desc: row.description,
        }))
    }
}
