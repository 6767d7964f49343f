//! Scan lifecycle use cases

use std::sync::Arc;

use tracing::instrument;

use bearded_core::domain::ids::{ScanId, SessionId, UserId};
use bearded_core::domain::scan::{
    Dates, IScanRepository, Scan, ScanConf, ScanError, ScanFilter, ScanPage, ScanStatus,
};

use crate::domain::services::ScanDispatcher;

use super::expander::WorkflowExpander;
use super::validation::{CreateScanCommand, ScanRequestValidator};

/// Use case for creating a scan from a project, target and plan
///
/// Validation and expansion are read-only; the repository write is the only
/// side effect, so any earlier failure leaves storage untouched.
pub struct CreateScanUseCase {
    validator: ScanRequestValidator,
    expander: WorkflowExpander,
    scan_repository: Arc<dyn IScanRepository>,
    dispatcher: Arc<dyn ScanDispatcher>,
}

impl CreateScanUseCase {
    pub fn new(
        validator: ScanRequestValidator,
        expander: WorkflowExpander,
        scan_repository: Arc<dyn IScanRepository>,
        dispatcher: Arc<dyn ScanDispatcher>,
    ) -> Self {
        Self {
            validator,
            expander,
            scan_repository,
            dispatcher,
        }
    }

    #[instrument(skip(self, command), fields(owner = %owner))]
    pub async fn execute(&self, command: CreateScanCommand, owner: UserId) -> Result<Scan, ScanError> {
        let scan = self.build(&command, owner).await.inspect_err(|e| {
            if e.is_bad_request() {
                tracing::info!(reason = %e, "Scan request rejected");
            }
        })?;

        self.scan_repository.create(&scan).await?;

        tracing::info!(
            scan_id = %scan.id,
            sessions = scan.sessions.len(),
            "Scan created"
        );

        // The scan is already durable; a failed hand-off is not rolled back
        if let Err(e) = self.dispatcher.dispatch(&scan).await {
            tracing::error!(scan_id = %scan.id, error = %e, "Scan dispatch failed");
        }

        Ok(scan)
    }

    async fn build(&self, command: &CreateScanCommand, owner: UserId) -> Result<Scan, ScanError> {
        let validated = self.validator.validate(command).await?;

        let now = Dates::now();
        let sessions = self.expander.expand(&validated.plan, now).await?;

        Ok(Scan {
            id: ScanId::generate(),
            status: ScanStatus::Created,
            owner,
            project: validated.project.id,
            target: validated.target.id,
            plan: validated.plan.id,
            conf: ScanConf {
                target: validated.target.addr().to_string(),
            },
            sessions,
            dates: Dates::at(now),
        })
    }
}

/// Use case for fetching a single scan
pub struct GetScanUseCase {
    scan_repository: Arc<dyn IScanRepository>,
}

impl GetScanUseCase {
    pub fn new(scan_repository: Arc<dyn IScanRepository>) -> Self {
        Self { scan_repository }
    }

    #[instrument(skip(self), fields(scan_id = %id))]
    pub async fn execute(&self, id: ScanId) -> Result<Scan, ScanError> {
        self.scan_repository
            .find_by_id(&id)
            .await?
            .ok_or_else(|| ScanError::NotFound { id: id.to_string() })
    }
}

/// Use case for listing scans
pub struct ListScansUseCase {
    scan_repository: Arc<dyn IScanRepository>,
}

impl ListScansUseCase {
    pub fn new(scan_repository: Arc<dyn IScanRepository>) -> Self {
        Self { scan_repository }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, filter: ScanFilter) -> Result<ScanPage, ScanError> {
        self.scan_repository.filter_by(&filter).await
    }
}

/// Use case for deleting a scan together with its sessions
pub struct DeleteScanUseCase {
    scan_repository: Arc<dyn IScanRepository>,
}

impl DeleteScanUseCase {
    pub fn new(scan_repository: Arc<dyn IScanRepository>) -> Self {
        Self { scan_repository }
    }

    /// Deleting an absent id is `NotFound`, including repeat deletes
    #[instrument(skip(self), fields(scan_id = %id))]
    pub async fn execute(&self, id: ScanId) -> Result<(), ScanError> {
        if self.scan_repository.delete(&id).await? {
            tracing::info!(scan_id = %id, "Scan deleted");
            Ok(())
        } else {
            Err(ScanError::NotFound { id: id.to_string() })
        }
    }
}

/// Use case for moving a scan through its status machine
///
/// Intended for the execution subsystem. Only status and the updated
/// timestamp change; sessions and the configuration snapshot stay as created.
pub struct TransitionScanUseCase {
    scan_repository: Arc<dyn IScanRepository>,
}

impl TransitionScanUseCase {
    pub fn new(scan_repository: Arc<dyn IScanRepository>) -> Self {
        Self { scan_repository }
    }

    #[instrument(skip(self), fields(scan_id = %id, to = %to))]
    pub async fn execute(&self, id: ScanId, to: ScanStatus) -> Result<Scan, ScanError> {
        let scan = self
            .scan_repository
            .transition_scan(&id, to, Dates::now())
            .await?;
        tracing::debug!(scan_id = %id, status = %scan.status, "Scan status changed");
        Ok(scan)
    }
}

/// Use case for moving one session through its status machine
pub struct TransitionSessionUseCase {
    scan_repository: Arc<dyn IScanRepository>,
}

impl TransitionSessionUseCase {
    pub fn new(scan_repository: Arc<dyn IScanRepository>) -> Self {
        Self { scan_repository }
    }

    #[instrument(skip(self), fields(scan_id = %id, session_id = %session_id, to = %to))]
    pub async fn execute(
        &self,
        id: ScanId,
        session_id: SessionId,
        to: ScanStatus,
    ) -> Result<Scan, ScanError> {
        let scan = self
            .scan_repository
            .transition_session(&id, &session_id, to, Dates::now())
            .await?;
        tracing::debug!(scan_id = %id, session_id = %session_id, "Session status changed");
        Ok(scan)
    }
}
