//! API request and response models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use bearded_core::domain::catalog::WorkflowStep;
use bearded_core::domain::ids::{PlanId, ProjectId, TargetId};
use bearded_core::domain::scan::{Scan, ScanFilter, ScanStatus, Session};

use crate::application::CreateScanCommand;

/// Request body for creating a scan
///
/// Absent fields are treated as empty references and rejected by the
/// validation chain with the matching "not found" reason.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateScanRequest {
    /// Project id
    #[schema(example = "0b8e6c52-7d2e-4e5e-9a51-2f1a9f3f7c10")]
    #[serde(default)]
    pub project: String,

    /// Target id; must belong to `project`
    #[schema(example = "5f0c8a1e-2b7d-4c3a-8e9f-1a2b3c4d5e6f")]
    #[serde(default)]
    pub target: String,

    /// Plan id; its target type must match the target's
    #[schema(example = "9a8b7c6d-5e4f-4a3b-9c2d-1e0f9a8b7c6d")]
    #[serde(default)]
    pub plan: String,
}

impl From<CreateScanRequest> for CreateScanCommand {
    fn from(request: CreateScanRequest) -> Self {
        Self {
            project: request.project,
            target: request.target,
            plan: request.plan,
        }
    }
}

/// Workflow step snapshot carried by a session
#[derive(Debug, Serialize, ToSchema)]
pub struct WorkflowStepDto {
    pub name: String,
    /// Plugin reference in `name:version` form
    #[schema(example = "nmap:1.0")]
    pub plugin: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub desc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conf: Option<serde_json::Value>,
}

impl From<WorkflowStep> for WorkflowStepDto {
    fn from(step: WorkflowStep) -> Self {
        Self {
            name: step.name,
            plugin: step.plugin,
            desc: step.desc,
            conf: step.conf,
        }
    }
}

/// One executable unit of a scan
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionDto {
    pub id: Uuid,
    pub step: WorkflowStepDto,
    /// Plugin resolved when the scan was created
    pub plugin: Uuid,
    pub status: ScanStatus,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl From<Session> for SessionDto {
    fn from(session: Session) -> Self {
        Self {
            id: session.id.as_uuid(),
            step: session.step.into(),
            plugin: session.plugin.as_uuid(),
            status: session.status,
            created: session.dates.created,
            updated: session.dates.updated,
        }
    }
}

/// Configuration captured at creation time
#[derive(Debug, Serialize, ToSchema)]
pub struct ScanConfDto {
    /// Target address snapshot
    #[schema(example = "https://example.com")]
    pub target: String,
}

/// Scan with its sessions
#[derive(Debug, Serialize, ToSchema)]
pub struct ScanDto {
    pub id: Uuid,
    pub status: ScanStatus,
    pub owner: Uuid,
    pub project: Uuid,
    pub target: Uuid,
    pub plan: Uuid,
    pub conf: ScanConfDto,
    pub sessions: Vec<SessionDto>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl From<Scan> for ScanDto {
    fn from(scan: Scan) -> Self {
        Self {
            id: scan.id.as_uuid(),
            status: scan.status,
            owner: scan.owner.as_uuid(),
            project: scan.project.as_uuid(),
            target: scan.target.as_uuid(),
            plan: scan.plan.as_uuid(),
            conf: ScanConfDto {
                target: scan.conf.target,
            },
            sessions: scan.sessions.into_iter().map(SessionDto::from).collect(),
            created: scan.dates.created,
            updated: scan.dates.updated,
        }
    }
}

/// Query parameters for listing scans
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListScansQuery {
    /// Only scans of this project
    pub project: Option<String>,
    /// Only scans of this target
    pub target: Option<String>,
    /// Only scans of this plan
    pub plan: Option<String>,
    /// Only scans in this status
    pub status: Option<String>,
    /// Number of scans to skip
    pub skip: Option<u64>,
    /// Page size (default 50, max 500)
    pub limit: Option<u64>,
}

impl ListScansQuery {
    /// Parse into a repository filter; the error names the offending parameter
    pub fn into_filter(self) -> Result<ScanFilter, String> {
        let project = self
            .project
            .map(|v| ProjectId::parse(&v).map_err(|_| format!("invalid project id: {}", v)))
            .transpose()?;
        let target = self
            .target
            .map(|v| TargetId::parse(&v).map_err(|_| format!("invalid target id: {}", v)))
            .transpose()?;
        let plan = self
            .plan
            .map(|v| PlanId::parse(&v).map_err(|_| format!("invalid plan id: {}", v)))
            .transpose()?;
        let status = self
            .status
            .map(|v| ScanStatus::parse(&v).ok_or_else(|| format!("invalid status: {}", v)))
            .transpose()?;

        Ok(ScanFilter {
            project,
            target,
            plan,
            status,
            skip: self.skip.unwrap_or(0),
            limit: self.limit,
        })
    }
}

/// Paging metadata of a list response
#[derive(Debug, Serialize, ToSchema)]
pub struct ListMeta {
    /// Total number of scans matching the filter
    pub count: u64,
    /// Link to the previous page, if any
    pub previous: Option<String>,
    /// Link to the next page, if any
    pub next: Option<String>,
}

/// Scan list response
#[derive(Debug, Serialize, ToSchema)]
pub struct ScanListResponse {
    pub meta: ListMeta,
    pub results: Vec<ScanDto>,
}

/// Error response model
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code
    #[schema(example = "PLAN_NOT_FOUND")]
    pub code: String,

    /// Human-readable error message
    #[schema(example = "plan not found")]
    pub message: String,

    /// Additional error context
    pub details: Option<serde_json::Value>,

    /// Request identifier, same as the `x-request-id` response header
    pub request_id: Uuid,

    /// Error occurrence timestamp
    #[schema(example = "2024-01-15T10:30:00Z")]
    pub timestamp: DateTime<Utc>,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall service health status
    #[schema(example = "healthy")]
    pub status: String,

    /// Current service version
    #[schema(example = "0.3.0")]
    pub version: String,

    /// Health check timestamp
    pub timestamp: DateTime<Utc>,

    /// Storage backend status
    #[schema(example = r#"{"storage": {"backend": "postgres", "status": "healthy"}}"#)]
    pub details: Option<serde_json::Value>,
}
