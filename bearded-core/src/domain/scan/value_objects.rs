//! Scan value objects

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Status shared by scans and their sessions
///
/// Only `Created` is produced by the orchestrator; the rest belong to the
/// execution subsystem, which drives them through [`ScanStatus::can_transition_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    /// Expanded and persisted, not yet handed to a worker
    Created,
    /// Waiting in the execution queue
    Queued,
    /// A worker is executing it
    Working,
    /// Suspended by the execution subsystem
    Paused,
    /// Completed successfully
    Finished,
    /// Completed with an error
    Failed,
}

impl ScanStatus {
    /// Returns the set of valid target states from the current state.
    ///
    /// ```text
    /// Created ──► Queued ──► Working ──► Finished
    ///    │          │         │  ▲
    ///    │          │         ▼  │
    ///    │          │        Paused
    ///    │          │         │
    ///    └──────────┴─────────┴──► Failed
    /// ```
    pub fn valid_transitions(&self) -> &[ScanStatus] {
        match self {
            Self::Created => &[Self::Queued, Self::Failed],
            Self::Queued => &[Self::Working, Self::Failed],
            Self::Working => &[Self::Paused, Self::Finished, Self::Failed],
            Self::Paused => &[Self::Working, Self::Failed],
            Self::Finished | Self::Failed => &[],
        }
    }

    pub fn can_transition_to(&self, target: &ScanStatus) -> bool {
        self.valid_transitions().contains(target)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Queued => "queued",
            Self::Working => "working",
            Self::Paused => "paused",
            Self::Finished => "finished",
            Self::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "created" => Some(Self::Created),
            "queued" => Some(Self::Queued),
            "working" => Some(Self::Working),
            "paused" => Some(Self::Paused),
            "finished" => Some(Self::Finished),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an invalid status transition is attempted
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid status transition from {from} to {to}")]
pub struct StatusTransitionError {
    pub from: ScanStatus,
    pub to: ScanStatus,
}

impl StatusTransitionError {
    /// Validate `from -> to` against the state machine
    pub fn check(from: ScanStatus, to: ScanStatus) -> Result<(), Self> {
        if from.can_transition_to(&to) {
            Ok(())
        } else {
            Err(Self { from, to })
        }
    }
}

/// Creation and last-update timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dates {
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Dates {
    /// Sub-second digits kept, matching PostgreSQL `TIMESTAMPTZ`
    pub const PRECISION: u16 = 6;

    /// Both timestamps set to the same instant
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            created: now,
            updated: now,
        }
    }

    /// Current instant truncated to [`Dates::PRECISION`]
    ///
    /// Scan columns and the sessions document must round-trip to the same value.
    pub fn now() -> DateTime<Utc> {
        Utc::now().trunc_subsecs(Self::PRECISION)
    }
}

/// Configuration snapshot taken when the scan is created
///
/// Later edits to the target do not reach an in-flight scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConf {
    /// Target address at creation time
    pub target: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_can_only_move_to_queued_or_failed() {
        assert!(ScanStatus::Created.can_transition_to(&ScanStatus::Queued));
        assert!(ScanStatus::Created.can_transition_to(&ScanStatus::Failed));
        assert!(!ScanStatus::Created.can_transition_to(&ScanStatus::Working));
        assert!(!ScanStatus::Created.can_transition_to(&ScanStatus::Finished));
        assert!(!ScanStatus::Created.can_transition_to(&ScanStatus::Created));
    }

    #[test]
    fn paused_resumes_to_working() {
        assert!(ScanStatus::Working.can_transition_to(&ScanStatus::Paused));
        assert!(ScanStatus::Paused.can_transition_to(&ScanStatus::Working));
        assert!(!ScanStatus::Paused.can_transition_to(&ScanStatus::Finished));
    }

    #[test]
    fn terminal_states_have_no_exits() {
        for status in [ScanStatus::Finished, ScanStatus::Failed] {
            assert!(status.is_terminal());
            assert!(status.valid_transitions().is_empty());
        }
        assert!(!ScanStatus::Created.is_terminal());
    }

    #[test]
    fn check_reports_both_ends() {
        let err = StatusTransitionError::check(ScanStatus::Finished, ScanStatus::Working).unwrap_err();
        assert_eq!(err.from, ScanStatus::Finished);
        assert_eq!(err.to, ScanStatus::Working);
        assert_eq!(
            err.to_string(),
            "Invalid status transition from finished to working"
        );
    }

    #[test]
    fn now_is_truncated_to_microseconds() {
        let now = Dates::now();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000, 0);
        assert_eq!(now.trunc_subsecs(Dates::PRECISION), now);
    }

    #[test]
    fn status_uses_lowercase_wire_names() {
        assert_eq!(serde_json::to_string(&ScanStatus::Created).unwrap(), "\"created\"");
        assert_eq!(ScanStatus::parse("paused"), Some(ScanStatus::Paused));
        assert_eq!(ScanStatus::parse("Created"), None);
    }
}
