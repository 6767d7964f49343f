//! Test doubles for bearded-orchestrator

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use bearded_core::domain::catalog::{CatalogError, IPluginRepository, Plugin};
use bearded_core::domain::ids::{ScanId, SessionId};
use bearded_core::domain::scan::{
    IScanRepository, Scan, ScanError, ScanFilter, ScanPage, ScanStatus,
};
use bearded_orchestrator::domain::services::{DispatchError, ScanDispatcher};

// ── Plugin registry ──

/// Registry whose every lookup fails
pub struct UnavailablePluginRegistry;

#[async_trait]
impl IPluginRepository for UnavailablePluginRegistry {
    async fn find_by_name_version(
        &self,
        _name: &str,
        _version: &str,
    ) -> Result<Option<Plugin>, CatalogError> {
        Err(CatalogError::DatabaseError {
            message: "registry connection reset".to_string(),
        })
    }
}

// ── Scan repository ──

/// Scan repository whose writes fail
pub struct UnavailableScanRepository;

#[async_trait]
impl IScanRepository for UnavailableScanRepository {
    async fn create(&self, _scan: &Scan) -> Result<(), ScanError> {
        Err(ScanError::DatabaseError {
            message: "disk full".to_string(),
        })
    }

    async fn find_by_id(&self, _id: &ScanId) -> Result<Option<Scan>, ScanError> {
        Ok(None)
    }

    async fn filter_by(&self, _filter: &ScanFilter) -> Result<ScanPage, ScanError> {
        Ok(ScanPage::default())
    }

    async fn delete(&self, _id: &ScanId) -> Result<bool, ScanError> {
        Ok(false)
    }

    async fn transition_scan(
        &self,
        id: &ScanId,
        _to: ScanStatus,
        _at: DateTime<Utc>,
    ) -> Result<Scan, ScanError> {
        Err(ScanError::NotFound { id: id.to_string() })
    }

    async fn transition_session(
        &self,
        id: &ScanId,
        _session_id: &SessionId,
        _to: ScanStatus,
        _at: DateTime<Utc>,
    ) -> Result<Scan, ScanError> {
        Err(ScanError::NotFound { id: id.to_string() })
    }
}

// ── Dispatchers ──

/// Records every scan handed to it
#[derive(Default)]
pub struct RecordingDispatcher {
    pub dispatched: Mutex<Vec<ScanId>>,
}

#[async_trait]
impl ScanDispatcher for RecordingDispatcher {
    async fn dispatch(&self, scan: &Scan) -> Result<(), DispatchError> {
        self.dispatched.lock().await.push(scan.id);
        Ok(())
    }
}

/// Rejects every scan
pub struct FailingDispatcher;

#[async_trait]
impl ScanDispatcher for FailingDispatcher {
    async fn dispatch(&self, _scan: &Scan) -> Result<(), DispatchError> {
        Err(DispatchError::Unavailable {
            message: "queue offline".to_string(),
        })
    }
}
