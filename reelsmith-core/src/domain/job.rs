//! Video job domain types
//!
//! The job record is the unit of the status ledger. Its status moves
//! strictly forward:
//!
//! ```text
//!   Queued ──→ Generating ──→ Uploading ──→ Completed
//!     │            │              │
//!     └────────────┴──────────────┴──→ Failed
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::region::Region;

/// Video generation record
///
/// Structure shared between orchestrator (persists) and clients (display).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoJob {
    pub id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub title: String,
    pub recipe_text: String,
    pub people: String,
    pub region: Region,
    pub video_prompt: String,
    pub provider_job_id: Option<String>,
    pub status: JobStatus,
    pub error_message: Option<String>,
    pub storage_path: Option<String>,
    pub video_url: Option<String>,
}

/// Job lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Generating,
    Uploading,
    Completed,
    Failed,
}

impl JobStatus {
    pub const ALL: [JobStatus; 5] = [
        JobStatus::Queued,
        JobStatus::Generating,
        JobStatus::Uploading,
        JobStatus::Completed,
        JobStatus::Failed,
    ];

    /// `Completed` and `Failed` admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Whether the ledger may move a job from `self` to `next`.
    ///
    /// Progress only moves forward along the ordered path and may skip a
    /// step whose write was lost; `Failed` is reachable from every
    /// non-terminal status.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            JobStatus::Failed => true,
            JobStatus::Queued => false,
            _ => next.rank() > self.rank(),
        }
    }

    /// Position along `Queued -> Generating -> Uploading -> Completed`
    fn rank(self) -> u8 {
        match self {
            JobStatus::Queued => 0,
            JobStatus::Generating => 1,
            JobStatus::Uploading => 2,
            JobStatus::Completed => 3,
            JobStatus::Failed => 4,
        }
    }

    /// Statuses a job may currently hold for `self` to be a legal next step.
    pub fn predecessors(self) -> Vec<JobStatus> {
        JobStatus::ALL
            .into_iter()
            .filter(|from| from.can_transition_to(self))
            .collect()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Generating => "generating",
            JobStatus::Uploading => "uploading",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown job status '{}'", s))
    }
}
