//! Scan request validation chain
//!
//! Checks run in a fixed order and the first failure wins:
//! project, target, target/project ownership, plan, plan/target type.

use std::sync::Arc;

use tracing::instrument;

use bearded_core::domain::catalog::{
    CatalogError, IPlanRepository, IProjectRepository, ITargetRepository, Plan, Project, Target,
};
use bearded_core::domain::ids::{PlanId, ProjectId, TargetId};
use bearded_core::domain::scan::ScanError;

/// Unvalidated scan creation input
///
/// References are kept as raw strings so a malformed id fails at its own
/// position in the chain rather than before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateScanCommand {
    pub project: String,
    pub target: String,
    pub plan: String,
}

/// The catalog entities a scan request resolved to
#[derive(Debug, Clone)]
pub struct ValidatedScanRequest {
    pub project: Project,
    pub target: Target,
    pub plan: Plan,
}

pub struct ScanRequestValidator {
    projects: Arc<dyn IProjectRepository>,
    targets: Arc<dyn ITargetRepository>,
    plans: Arc<dyn IPlanRepository>,
}

impl ScanRequestValidator {
    pub fn new(
        projects: Arc<dyn IProjectRepository>,
        targets: Arc<dyn ITargetRepository>,
        plans: Arc<dyn IPlanRepository>,
    ) -> Self {
        Self {
            projects,
            targets,
            plans,
        }
    }

    #[instrument(skip(self, command), fields(project = %command.project, target = %command.target, plan = %command.plan))]
    pub async fn validate(
        &self,
        command: &CreateScanCommand,
    ) -> Result<ValidatedScanRequest, ScanError> {
        let project = match ProjectId::parse(&command.project) {
            Ok(id) => self
                .projects
                .find_by_id(&id)
                .await
                .map_err(|e| lookup_failed("project", e))?,
            Err(_) => None,
        }
        .ok_or(ScanError::ProjectNotFound)?;

        let target = match TargetId::parse(&command.target) {
            Ok(id) => self
                .targets
                .find_by_id(&id)
                .await
                .map_err(|e| lookup_failed("target", e))?,
            Err(_) => None,
        }
        .ok_or(ScanError::TargetNotFound)?;

        if !target.belongs_to(&project.id) {
            return Err(ScanError::TargetProjectMismatch);
        }

        let plan = match PlanId::parse(&command.plan) {
            Ok(id) => self
                .plans
                .find_by_id(&id)
                .await
                .map_err(|e| lookup_failed("plan", e))?,
            Err(_) => None,
        }
        .ok_or(ScanError::PlanNotFound)?;

        if !plan.is_compatible_with(&target) {
            return Err(ScanError::IncompatibleTargetType);
        }

        Ok(ValidatedScanRequest {
            project,
            target,
            plan,
        })
    }
}

fn lookup_failed(entity: &'static str, error: CatalogError) -> ScanError {
    tracing::error!(entity, error = %error, "Catalog lookup failed");
    ScanError::from(error)
}
