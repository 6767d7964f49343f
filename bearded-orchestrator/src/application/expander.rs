//! Workflow expansion: plan steps to scan sessions

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::instrument;

use bearded_core::domain::catalog::{IPluginRepository, Plan};
use bearded_core::domain::scan::{ScanError, Session};

/// Turns a plan's workflow into one session per step, in step order
///
/// Expansion is all-or-nothing: the first step whose plugin cannot be
/// resolved aborts it and nothing is returned.
pub struct WorkflowExpander {
    plugins: Arc<dyn IPluginRepository>,
}

impl WorkflowExpander {
    pub fn new(plugins: Arc<dyn IPluginRepository>) -> Self {
        Self { plugins }
    }

    /// Every session gets `now` as both created and updated time
    #[instrument(skip(self, plan), fields(plan_id = %plan.id, steps = plan.workflow.len()))]
    pub async fn expand(
        &self,
        plan: &Plan,
        now: DateTime<Utc>,
    ) -> Result<Vec<Session>, ScanError> {
        let mut sessions = Vec::with_capacity(plan.workflow.len());

        for step in &plan.workflow {
            let reference = step
                .plugin_ref()
                .map_err(|e| ScanError::MalformedPluginRef {
                    reference: e.reference,
                })?;

            let plugin = self
                .plugins
                .find_by_name_version(&reference.name, &reference.version)
                .await
                .map_err(|e| {
                    tracing::error!(plugin = %reference, error = %e, "Plugin registry lookup failed");
                    ScanError::from(e)
                })?
                .ok_or_else(|| ScanError::PluginNotFound {
                    reference: step.plugin.clone(),
                })?;

            sessions.push(Session::new(step.clone(), plugin.id, now));
        }

        Ok(sessions)
    }
}
