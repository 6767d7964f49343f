//! Orchestrator infrastructure layer

pub mod dispatch;
pub mod memory;
pub mod postgres;

pub use dispatch::NoopScanDispatcher;
pub use memory::{CatalogSeed, InMemoryStore, SeedError};
pub use postgres::{SqlxCatalogRepository, SqlxScanRepository};

use sqlx::PgPool;
use std::sync::Arc;

use bearded_core::domain::catalog::{
    IPlanRepository, IPluginRepository, IProjectRepository, ITargetRepository,
};
use bearded_core::domain::scan::IScanRepository;

/// Every repository the scan use cases read from or write to
#[derive(Clone)]
pub struct Repositories {
    pub projects: Arc<dyn IProjectRepository>,
    pub targets: Arc<dyn ITargetRepository>,
    pub plans: Arc<dyn IPlanRepository>,
    pub plugins: Arc<dyn IPluginRepository>,
    pub scans: Arc<dyn IScanRepository>,
}

impl Repositories {
    /// All repositories served by one in-memory store
    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            projects: store.clone(),
            targets: store.clone(),
            plans: store.clone(),
            plugins: store.clone(),
            scans: store,
        }
    }

    pub fn postgres(pool: Arc<PgPool>) -> Self {
        let catalog = Arc::new(SqlxCatalogRepository::new(pool.clone()));
        Self {
            projects: catalog.clone(),
            targets: catalog.clone(),
            plans: catalog.clone(),
            plugins: catalog,
            scans: Arc::new(SqlxScanRepository::new(pool)),
        }
    }
}
