//! Orchestrator API controllers

pub mod health;
pub mod scans;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use sqlx::PgPool;
use std::sync::Arc;

use bearded_core::domain::scan::ScanError;

use crate::application::{
    CreateScanUseCase, DeleteScanUseCase, GetScanUseCase, ListScansUseCase, ScanRequestValidator,
    WorkflowExpander,
};
use crate::domain::services::ScanDispatcher;
use crate::infrastructure::Repositories;
use crate::presentation::auth::AuthState;
use crate::presentation::middleware::current_request_id;
use crate::presentation::models::ErrorResponse;

/// Application state for orchestrator
#[derive(Clone)]
pub struct OrchestratorState {
    pub create_scan_use_case: Arc<CreateScanUseCase>,
    pub get_scan_use_case: Arc<GetScanUseCase>,
    pub list_scans_use_case: Arc<ListScansUseCase>,
    pub delete_scan_use_case: Arc<DeleteScanUseCase>,
    pub auth_state: AuthState,
    /// Present when scans live in PostgreSQL; probed by the health check
    pub db_pool: Option<Arc<PgPool>>,
}

impl OrchestratorState {
    pub fn new(
        repositories: Repositories,
        dispatcher: Arc<dyn ScanDispatcher>,
        auth_state: AuthState,
    ) -> Self {
        let validator = ScanRequestValidator::new(
            repositories.projects.clone(),
            repositories.targets.clone(),
            repositories.plans.clone(),
        );
        let expander = WorkflowExpander::new(repositories.plugins.clone());

        Self {
            create_scan_use_case: Arc::new(CreateScanUseCase::new(
                validator,
                expander,
                repositories.scans.clone(),
                dispatcher,
            )),
            get_scan_use_case: Arc::new(GetScanUseCase::new(repositories.scans.clone())),
            list_scans_use_case: Arc::new(ListScansUseCase::new(repositories.scans.clone())),
            delete_scan_use_case: Arc::new(DeleteScanUseCase::new(repositories.scans)),
            auth_state,
            db_pool: None,
        }
    }

    pub fn with_db_pool(mut self, pool: Arc<PgPool>) -> Self {
        self.db_pool = Some(pool);
        self
    }
}

pub(crate) fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    let body = Json(ErrorResponse {
        code: code.to_string(),
        message: message.to_string(),
        details: None,
        request_id: current_request_id(),
        timestamp: chrono::Utc::now(),
    });

    (status, body).into_response()
}

/// Map a scan error to its HTTP status, code and public message
///
/// Infrastructure details were logged where they occurred and are replaced
/// by a generic message here.
pub(crate) fn map_scan_error(error: ScanError) -> Response {
    let (status, code, message) = match &error {
        ScanError::ProjectNotFound => (StatusCode::BAD_REQUEST, "PROJECT_NOT_FOUND", error.to_string()),
        ScanError::TargetNotFound => (StatusCode::BAD_REQUEST, "TARGET_NOT_FOUND", error.to_string()),
        ScanError::TargetProjectMismatch => (
            StatusCode::BAD_REQUEST,
            "TARGET_PROJECT_MISMATCH",
            error.to_string(),
        ),
        ScanError::PlanNotFound => (StatusCode::BAD_REQUEST, "PLAN_NOT_FOUND", error.to_string()),
        ScanError::IncompatibleTargetType => (
            StatusCode::BAD_REQUEST,
            "INCOMPATIBLE_TARGET_TYPE",
            error.to_string(),
        ),
        ScanError::PluginNotFound { .. } | ScanError::MalformedPluginRef { .. } => {
            (StatusCode::BAD_REQUEST, "PLUGIN_NOT_FOUND", error.to_string())
        }
        ScanError::NotFound { .. } => (StatusCode::NOT_FOUND, "SCAN_NOT_FOUND", error.to_string()),
        ScanError::SessionNotFound { .. } => {
            (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND", error.to_string())
        }
        ScanError::InvalidTransition { .. } => {
            (StatusCode::CONFLICT, "INVALID_TRANSITION", error.to_string())
        }
        ScanError::Duplicate { .. } => (StatusCode::CONFLICT, "DUPLICATE_SCAN", error.to_string()),
        ScanError::DatabaseError { .. } | ScanError::InternalError { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "Internal server error".to_string(),
        ),
    };

    error_response(status, code, &message)
}
