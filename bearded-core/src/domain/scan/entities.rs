//! Scan aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::catalog::WorkflowStep;
use crate::domain::ids::{PlanId, PluginId, ProjectId, ScanId, SessionId, TargetId, UserId};

use super::value_objects::{Dates, ScanConf, ScanStatus, StatusTransitionError};

/// One executable unit of a scan, expanded from a single workflow step
///
/// The step is a snapshot and the plugin id was resolved once at creation;
/// neither changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub step: WorkflowStep,
    pub plugin: PluginId,
    pub status: ScanStatus,
    pub dates: Dates,
}

impl Session {
    pub fn new(step: WorkflowStep, plugin: PluginId, now: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::generate(),
            step,
            plugin,
            status: ScanStatus::Created,
            dates: Dates::at(now),
        }
    }

    /// Move to `to` if the state machine allows it
    pub fn transition(
        &mut self,
        to: ScanStatus,
        at: DateTime<Utc>,
    ) -> Result<(), StatusTransitionError> {
        StatusTransitionError::check(self.status, to)?;
        self.status = to;
        self.dates.updated = at;
        Ok(())
    }
}

/// Aggregate root created per scan request; owns its sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scan {
    pub id: ScanId,
    pub status: ScanStatus,
    pub owner: UserId,
    pub project: ProjectId,
    pub target: TargetId,
    pub plan: PlanId,
    pub conf: ScanConf,
    pub sessions: Vec<Session>,
    pub dates: Dates,
}

impl Scan {
    pub fn session(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| &s.id == id)
    }

    pub fn session_mut(&mut self, id: &SessionId) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| &s.id == id)
    }

    /// Move the scan itself to `to`; sessions are untouched
    pub fn transition(
        &mut self,
        to: ScanStatus,
        at: DateTime<Utc>,
    ) -> Result<(), StatusTransitionError> {
        StatusTransitionError::check(self.status, to)?;
        self.status = to;
        self.dates.updated = at;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn scan_with_one_session(now: DateTime<Utc>) -> Scan {
        Scan {
            id: ScanId::generate(),
            status: ScanStatus::Created,
            owner: UserId::generate(),
            project: ProjectId::generate(),
            target: TargetId::generate(),
            plan: PlanId::generate(),
            conf: ScanConf {
                target: "example.com".into(),
            },
            sessions: vec![Session::new(
                WorkflowStep::new("discovery", "nmap:1.0"),
                PluginId::generate(),
                now,
            )],
            dates: Dates::at(now),
        }
    }

    #[test]
    fn session_transition_bumps_only_updated() {
        let now = Utc::now();
        let later = now + Duration::seconds(5);
        let mut scan = scan_with_one_session(now);
        let session_id = scan.sessions[0].id;

        let session = scan.session_mut(&session_id).unwrap();
        session.transition(ScanStatus::Queued, later).unwrap();

        let session = scan.session(&session_id).unwrap();
        assert_eq!(session.status, ScanStatus::Queued);
        assert_eq!(session.dates.created, now);
        assert_eq!(session.dates.updated, later);
        assert_eq!(scan.status, ScanStatus::Created);
    }

    #[test]
    fn rejected_transition_leaves_state_untouched() {
        let now = Utc::now();
        let mut scan = scan_with_one_session(now);

        let err = scan
            .transition(ScanStatus::Finished, now + Duration::seconds(1))
            .unwrap_err();

        assert_eq!(err.from, ScanStatus::Created);
        assert_eq!(scan.status, ScanStatus::Created);
        assert_eq!(scan.dates.updated, now);
    }
}
