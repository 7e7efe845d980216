//! Run results.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::pipeline::PipelineStatus;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every pipeline succeeded.
    Succeeded,
    /// At least one pipeline failed or was blocked.
    Failed,
    /// Cancellation was requested during the run.
    Cancelled,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// The result of one pipeline within a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    /// Pipeline name.
    pub name: String,
    /// Final status.
    pub status: PipelineStatus,
    /// Number of documents published; zero unless the pipeline succeeded.
    pub documents: usize,
    /// Failure description for failed pipelines.
    pub error: Option<String>,
}

/// The result of a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// How the run ended.
    pub outcome: RunOutcome,
    /// One entry per pipeline, in declaration order.
    pub pipelines: Vec<PipelineReport>,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// Returns the report of `name`.
    #[must_use]
    pub fn pipeline(&self, name: &str) -> Option<&PipelineReport> {
        self.pipelines.iter().find(|p| p.name == name)
    }

    /// Returns true if the run succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome == RunOutcome::Succeeded
    }

    /// Names of pipelines with the given status.
    #[must_use]
    pub fn with_status(&self, status: PipelineStatus) -> Vec<&str> {
        self.pipelines
            .iter()
            .filter(|p| p.status == status)
            .map(|p| p.name.as_str())
            .collect()
    }

    pub(crate) fn outcome_for(cancelled: bool, pipelines: &[PipelineReport]) -> RunOutcome {
        if cancelled || pipelines.iter().any(|p| p.status == PipelineStatus::Cancelled) {
            RunOutcome::Cancelled
        } else if pipelines
            .iter()
            .all(|p| p.status == PipelineStatus::Succeeded)
        {
            RunOutcome::Succeeded
        } else {
            RunOutcome::Failed
        }
    }
}
