//! Scan domain errors

use thiserror::Error;

use crate::domain::catalog::CatalogError;

use super::value_objects::{ScanStatus, StatusTransitionError};

/// Scan domain errors
///
/// Referential variants carry the exact user-facing reason; infrastructure
/// variants carry detail for operators and must not reach callers verbatim.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    #[error("project not found")]
    ProjectNotFound,

    #[error("target not found")]
    TargetNotFound,

    #[error("this target is not from this project")]
    TargetProjectMismatch,

    #[error("plan not found")]
    PlanNotFound,

    #[error("target.type and plan.targetType is not compatible")]
    IncompatibleTargetType,

    /// Well-formed reference with no registered plugin
    #[error("plugin {reference} is not found")]
    PluginNotFound { reference: String },

    /// Reference that does not split into name and version
    #[error("plugin {reference} is not found: reference must be name:version")]
    MalformedPluginRef { reference: String },

    /// Scan not found on direct lookup
    #[error("Scan not found: {id}")]
    NotFound { id: String },

    #[error("Session {session_id} not found in scan {scan_id}")]
    SessionNotFound { scan_id: String, session_id: String },

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: ScanStatus, to: ScanStatus },

    /// Reserved for duplicate detection
    #[error("Scan already exists: {id}")]
    Duplicate { id: String },

    /// Database operation failed
    #[error("Database error: {message}")]
    DatabaseError { message: String },

    /// Internal error
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl ScanError {
    /// Direct lookup miss (scan or session)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ScanError::NotFound { .. } | ScanError::SessionNotFound { .. }
        )
    }

    /// Request references something that does not exist or does not fit together
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            ScanError::ProjectNotFound
                | ScanError::TargetNotFound
                | ScanError::TargetProjectMismatch
                | ScanError::PlanNotFound
                | ScanError::IncompatibleTargetType
                | ScanError::PluginNotFound { .. }
                | ScanError::MalformedPluginRef { .. }
        )
    }

    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ScanError::DatabaseError { .. } | ScanError::InternalError { .. }
        )
    }
}

impl From<CatalogError> for ScanError {
    fn from(error: CatalogError) -> Self {
        match error {
            CatalogError::DatabaseError { message } => ScanError::DatabaseError { message },
            CatalogError::CorruptRecord { message } => ScanError::InternalError { message },
        }
    }
}

impl From<StatusTransitionError> for ScanError {
    fn from(error: StatusTransitionError) -> Self {
        ScanError::InvalidTransition {
            from: error.from,
            to: error.to,
        }
    }
}
