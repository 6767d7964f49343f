//! Test data fixtures for bearded-orchestrator

use std::sync::Arc;

use bearded_core::domain::catalog::{Plan, Plugin, Project, Target, TargetType, WorkflowStep};
use bearded_core::domain::ids::UserId;
use bearded_orchestrator::application::{
    CreateScanCommand, CreateScanUseCase, ScanRequestValidator, WorkflowExpander,
};
use bearded_orchestrator::domain::services::ScanDispatcher;
use bearded_orchestrator::infrastructure::{InMemoryStore, NoopScanDispatcher, Repositories};

/// Catalog shared by most tests
///
/// `project` owns both targets; `foreign_target` belongs to `other_project`.
/// `web_plan` runs `nmap:1.0` then `zap:2.1`.
pub struct World {
    pub store: Arc<InMemoryStore>,
    pub owner: UserId,
    pub project: Project,
    pub other_project: Project,
    pub web_target: Target,
    pub host_target: Target,
    pub foreign_target: Target,
    pub web_plan: Plan,
    pub nmap: Plugin,
    pub zap: Plugin,
}

impl World {
    pub async fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let owner = UserId::generate();

        let project = Project::new(owner, "acme");
        let other_project = Project::new(UserId::generate(), "globex");
        let web_target = Target::new(project.id, TargetType::Web, "https://acme.example");
        let host_target = Target::new(project.id, TargetType::Host, "10.0.0.7");
        let foreign_target = Target::new(other_project.id, TargetType::Web, "https://globex.example");
        let nmap = Plugin::new("nmap", "1.0");
        let zap = Plugin::new("zap", "2.1");
        let web_plan = plan(TargetType::Web, &["nmap:1.0", "zap:2.1"]);

        store.insert_project(project.clone()).await;
        store.insert_project(other_project.clone()).await;
        store.insert_target(web_target.clone()).await;
        store.insert_target(host_target.clone()).await;
        store.insert_target(foreign_target.clone()).await;
        store.insert_plan(web_plan.clone()).await;
        store.insert_plugin(nmap.clone()).await;
        store.insert_plugin(zap.clone()).await;

        Self {
            store,
            owner,
            project,
            other_project,
            web_target,
            host_target,
            foreign_target,
            web_plan,
            nmap,
            zap,
        }
    }

    /// Store a new plan and return it
    pub async fn add_plan(&self, target_type: TargetType, refs: &[&str]) -> Plan {
        let plan = plan(target_type, refs);
        self.store.insert_plan(plan.clone()).await;
        plan
    }

    pub fn repositories(&self) -> Repositories {
        Repositories::in_memory(self.store.clone())
    }

    pub fn create_use_case(&self) -> CreateScanUseCase {
        create_use_case(self.repositories(), Arc::new(NoopScanDispatcher))
    }

    /// Request for the web target with the given plan
    pub fn web_command(&self, plan: &Plan) -> CreateScanCommand {
        command(
            &self.project.id.to_string(),
            &self.web_target.id.to_string(),
            &plan.id.to_string(),
        )
    }
}

pub fn plan(target_type: TargetType, refs: &[&str]) -> Plan {
    let workflow = refs
        .iter()
        .enumerate()
        .map(|(i, reference)| WorkflowStep::new(format!("step-{}", i + 1), *reference))
        .collect();
    Plan::new("test plan", target_type, workflow)
}

pub fn command(project: &str, target: &str, plan: &str) -> CreateScanCommand {
    CreateScanCommand {
        project: project.to_string(),
        target: target.to_string(),
        plan: plan.to_string(),
    }
}

pub fn create_use_case(
    repositories: Repositories,
    dispatcher: Arc<dyn ScanDispatcher>,
) -> CreateScanUseCase {
    CreateScanUseCase::new(
        ScanRequestValidator::new(
            repositories.projects.clone(),
            repositories.targets.clone(),
            repositories.plans.clone(),
        ),
        WorkflowExpander::new(repositories.plugins.clone()),
        repositories.scans,
        dispatcher,
    )
}
