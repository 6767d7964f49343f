//! In-memory catalog and scan storage
//!
//! Backs development runs and tests. Catalog data comes from a JSON seed
//! file; scans live only as long as the process.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use bearded_core::domain::catalog::{
    CatalogError, IPlanRepository, IPluginRepository, IProjectRepository, ITargetRepository, Plan,
    Plugin, Project, Target,
};
use bearded_core::domain::ids::{PlanId, ProjectId, ScanId, SessionId, TargetId};
use bearded_core::domain::scan::{IScanRepository, Scan, ScanError, ScanFilter, ScanPage, ScanStatus};

/// Catalog snapshot loaded into an [`InMemoryStore`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogSeed {
    pub projects: Vec<Project>,
    pub targets: Vec<Target>,
    pub plans: Vec<Plan>,
    pub plugins: Vec<Plugin>,
}

/// Seed loading errors
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid seed file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Plugin {reference} is registered more than once")]
    DuplicatePlugin { reference: String },
}

impl CatalogSeed {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub async fn load(path: &Path) -> Result<Self, SeedError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SeedError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json(&raw).map_err(|source| SeedError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Process-local implementation of every catalog and scan repository
#[derive(Default)]
pub struct InMemoryStore {
    projects: RwLock<HashMap<ProjectId, Project>>,
    targets: RwLock<HashMap<TargetId, Target>>,
    plans: RwLock<HashMap<PlanId, Plan>>,
    /// Keyed by (name, version); the registry holds one plugin per pair
    plugins: RwLock<HashMap<(String, String), Plugin>>,
    scans: RwLock<HashMap<ScanId, Scan>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn from_seed(seed: CatalogSeed) -> Result<Self, SeedError> {
        let store = Self::new();
        for project in seed.projects {
            store.insert_project(project).await;
        }
        for target in seed.targets {
            store.insert_target(target).await;
        }
        for plan in seed.plans {
            store.insert_plan(plan).await;
        }
        for plugin in seed.plugins {
            if store.insert_plugin(plugin.clone()).await.is_some() {
                return Err(SeedError::DuplicatePlugin {
                    reference: plugin.reference().to_string(),
                });
            }
        }
        Ok(store)
    }

    pub async fn insert_project(&self, project: Project) {
        self.projects.write().await.insert(project.id, project);
    }

    pub async fn insert_target(&self, target: Target) {
        self.targets.write().await.insert(target.id, target);
    }

    pub async fn insert_plan(&self, plan: Plan) {
        self.plans.write().await.insert(plan.id, plan);
    }

    /// Register a plugin, returning the one it replaced under the same name and version
    pub async fn insert_plugin(&self, plugin: Plugin) -> Option<Plugin> {
        let key = (plugin.name.clone(), plugin.version.clone());
        self.plugins.write().await.insert(key, plugin)
    }

    pub async fn scan_count(&self) -> usize {
        self.scans.read().await.len()
    }
}

#[async_trait]
impl IProjectRepository for InMemoryStore {
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, CatalogError> {
        Ok(self.projects.read().await.get(id).cloned())
    }
}

#[async_trait]
impl ITargetRepository for InMemoryStore {
    async fn find_by_id(&self, id: &TargetId) -> Result<Option<Target>, CatalogError> {
        Ok(self.targets.read().await.get(id).cloned())
    }
}

#[async_trait]
impl IPlanRepository for InMemoryStore {
    async fn find_by_id(&self, id: &PlanId) -> Result<Option<Plan>, CatalogError> {
        Ok(self.plans.read().await.get(id).cloned())
    }
}

#[async_trait]
impl IPluginRepository for InMemoryStore {
    async fn find_by_name_version(
        &self,
        name: &str,
        version: &str,
    ) -> Result<Option<Plugin>, CatalogError> {
        let key = (name.to_string(), version.to_string());
        Ok(self.plugins.read().await.get(&key).cloned())
    }
}

#[async_trait]
impl IScanRepository for InMemoryStore {
    async fn create(&self, scan: &Scan) -> Result<(), ScanError> {
        let mut scans = self.scans.write().await;
        if scans.contains_key(&scan.id) {
            return Err(ScanError::Duplicate {
                id: scan.id.to_string(),
            });
        }
        scans.insert(scan.id, scan.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ScanId) -> Result<Option<Scan>, ScanError> {
        Ok(self.scans.read().await.get(id).cloned())
    }

    async fn filter_by(&self, filter: &ScanFilter) -> Result<ScanPage, ScanError> {
        let scans = self.scans.read().await;
        let mut matching: Vec<&Scan> = scans.values().filter(|s| filter.matches(s)).collect();
        // Newest first, id as tie-breaker; same order as the SQL backend
        matching.sort_by(|a, b| {
            b.dates
                .created
                .cmp(&a.dates.created)
                .then_with(|| a.id.cmp(&b.id))
        });

        let count = matching.len() as u64;
        let results = matching
            .into_iter()
            .skip(usize::try_from(filter.skip).unwrap_or(usize::MAX))
            .take(filter.effective_limit() as usize)
            .cloned()
            .collect();

        Ok(ScanPage { results, count })
    }

    async fn delete(&self, id: &ScanId) -> Result<bool, ScanError> {
        Ok(self.scans.write().await.remove(id).is_some())
    }

    async fn transition_scan(
        &self,
        id: &ScanId,
        to: ScanStatus,
        at: DateTime<Utc>,
    ) -> Result<Scan, ScanError> {
        let mut scans = self.scans.write().await;
        let scan = scans
            .get_mut(id)
            .ok_or_else(|| ScanError::NotFound { id: id.to_string() })?;
        scan.transition(to, at)?;
        Ok(scan.clone())
    }

    async fn transition_session(
        &self,
        id: &ScanId,
        session_id: &SessionId,
        to: ScanStatus,
        at: DateTime<Utc>,
    ) -> Result<Scan, ScanError> {
        let mut scans = self.scans.write().await;
        let scan = scans
            .get_mut(id)
            .ok_or_else(|| ScanError::NotFound { id: id.to_string() })?;
        let session = scan
            .session_mut(session_id)
            .ok_or_else(|| ScanError::SessionNotFound {
                scan_id: id.to_string(),
                session_id: session_id.to_string(),
            })?;
        session.transition(to, at)?;
        Ok(scan.clone())
    }
}
