//! Orchestrator domain services

use async_trait::async_trait;

use bearded_core::domain::scan::Scan;

/// Hand-off of a freshly created scan to the execution subsystem
///
/// Called after the scan has been persisted. Implementations must not mutate
/// the stored aggregate; status changes go through the transition use cases.
#[async_trait]
pub trait ScanDispatcher: Send + Sync {
    async fn dispatch(&self, scan: &Scan) -> Result<(), DispatchError>;
}

/// Dispatch error
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Execution backend unavailable: {message}")]
    Unavailable { message: String },

    #[error("Scan {scan_id} rejected by execution backend: {reason}")]
    Rejected { scan_id: String, reason: String },
}
