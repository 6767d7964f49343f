//! Scan repository trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ids::{PlanId, ProjectId, ScanId, SessionId, TargetId};

use super::entities::Scan;
use super::errors::ScanError;
use super::value_objects::ScanStatus;

/// List filter; ordering and matching semantics belong to the repository
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanFilter {
    pub project: Option<ProjectId>,
    pub target: Option<TargetId>,
    pub plan: Option<PlanId>,
    pub status: Option<ScanStatus>,
    pub skip: u64,
    pub limit: Option<u64>,
}

impl ScanFilter {
    pub const DEFAULT_LIMIT: u64 = 50;
    pub const MAX_LIMIT: u64 = 500;

    /// Page size with default and upper bound applied
    pub fn effective_limit(&self) -> u64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    pub fn matches(&self, scan: &Scan) -> bool {
        self.project.is_none_or(|p| p == scan.project)
            && self.target.is_none_or(|t| t == scan.target)
            && self.plan.is_none_or(|p| p == scan.plan)
            && self.status.is_none_or(|s| s == scan.status)
    }
}

/// One page of scans plus the total number matching the filter
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    pub results: Vec<Scan>,
    pub count: u64,
}

/// Durable storage of scan aggregates
#[async_trait]
pub trait IScanRepository: Send + Sync {
    /// Persist a new scan with all of its sessions in one write
    async fn create(&self, scan: &Scan) -> Result<(), ScanError>;

    async fn find_by_id(&self, id: &ScanId) -> Result<Option<Scan>, ScanError>;

    async fn filter_by(&self, filter: &ScanFilter) -> Result<ScanPage, ScanError>;

    /// Remove a scan and its sessions. Returns `false` when nothing was stored under `id`.
    async fn delete(&self, id: &ScanId) -> Result<bool, ScanError>;

    /// Atomically validate and apply a scan status transition
    async fn transition_scan(
        &self,
        id: &ScanId,
        to: ScanStatus,
        at: DateTime<Utc>,
    ) -> Result<Scan, ScanError>;

    /// Atomically validate and apply a session status transition
    async fn transition_session(
        &self,
        id: &ScanId,
        session_id: &SessionId,
        to: ScanStatus,
        at: DateTime<Utc>,
    ) -> Result<Scan, ScanError>;
}
