//! Scan dispatch implementations

use async_trait::async_trait;

use bearded_core::domain::scan::Scan;

use crate::domain::services::{DispatchError, ScanDispatcher};

/// Dispatcher used until an execution backend consumes created scans
///
/// Leaves the scan in `created`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopScanDispatcher;

#[async_trait]
impl ScanDispatcher for NoopScanDispatcher {
    async fn dispatch(&self, scan: &Scan) -> Result<(), DispatchError> {
        tracing::debug!(
            scan_id = %scan.id,
            sessions = scan.sessions.len(),
            "No execution backend configured; scan stays created"
        );
        Ok(())
    }
}
